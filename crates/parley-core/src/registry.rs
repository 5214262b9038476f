//! The callable registry.
//!
//! A `Function` pairs a declared `Signature` (what the model is told) with a
//! handler (what actually runs). Parameter types are declared explicitly
//! when the function is built, so the schema always follows the signature
//! the handler reads.
//!
//! ```rust,ignore
//! let say_hello = Function::new("say_hello", |args| {
//!     let name: String = args.get("name")?;
//!     Ok(json!(format!("Hello, {name}!")))
//! })
//! .doc("Greets someone by name.")
//! .param::<String>("name");
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    tool::{Parameter, Signature},
    types::{DescribeType, TypeDescriptor},
};

/// A function body. Receives validated arguments, returns a JSON result.
pub type Handler = Box<dyn Fn(&Arguments) -> ParleyResult<Value>>;

/// The arguments of one call, keyed by parameter name.
#[derive(Debug, Clone)]
pub struct Arguments {
    function: String,
    values: Map<String, Value>,
}

impl Arguments {
    pub fn new(function: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            function: function.into(),
            values,
        }
    }

    /// Name of the function these arguments were passed to.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Deserialize the argument `name` into `T`.
    ///
    /// A missing argument or a value of the wrong shape is a
    /// `ParleyError::Dispatch`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> ParleyResult<T> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ParleyError::dispatch(&self.function, format!("missing argument '{name}'")))?;
        serde_json::from_value(value.clone()).map_err(|e| {
            ParleyError::dispatch(&self.function, format!("argument '{name}' is invalid: {e}"))
        })
    }
}

/// A registrable callable.
pub struct Function {
    signature: Signature,
    handler: Handler,
}

impl Function {
    /// A function with no parameters and no documentation yet.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Arguments) -> ParleyResult<Value> + 'static,
    {
        Self {
            signature: Signature::new(name),
            handler: Box::new(handler),
        }
    }

    /// Set the documentation text the model sees as the tool description.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.signature.doc = Some(doc.into());
        self
    }

    /// Declare a parameter typed after the Rust type `T`.
    pub fn param<T: DescribeType + ?Sized>(self, name: impl Into<String>) -> Self {
        self.param_typed(name, T::describe())
    }

    /// Declare a parameter with an explicit descriptor.
    pub fn param_typed(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.signature.params.push(Parameter {
            name: name.into(),
            ty: Some(ty),
        });
        self
    }

    /// Declare a parameter without a type. It is described as a string.
    pub fn param_untyped(mut self, name: impl Into<String>) -> Self {
        self.signature.params.push(Parameter {
            name: name.into(),
            ty: None,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Check argument names against the signature, then run the handler.
    ///
    /// Every declared parameter must be present and nothing else may be.
    pub fn call(&self, arguments: Map<String, Value>) -> ParleyResult<Value> {
        for param in &self.signature.params {
            if !arguments.contains_key(&param.name) {
                return Err(ParleyError::dispatch(
                    self.name(),
                    format!("missing argument '{}'", param.name),
                ));
            }
        }
        if let Some(extra) = arguments
            .keys()
            .find(|key| !self.signature.params.iter().any(|p| &p.name == *key))
        {
            return Err(ParleyError::dispatch(
                self.name(),
                format!("unexpected argument '{extra}'"),
            ));
        }

        (self.handler)(&Arguments::new(self.name(), arguments))
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Insertion-ordered mapping from function name to `Function`.
///
/// Owned by one agent and only modified while the agent is being built.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: Vec<Function>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `function`. A function with the same name is replaced in place,
    /// keeping its original position.
    pub fn register(&mut self, function: Function) {
        match self.functions.iter_mut().find(|f| f.name() == function.name()) {
            Some(slot) => *slot = function,
            None => self.functions.push(function),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Signatures in registration order, for schema extraction.
    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.functions.iter().map(Function::signature)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(Function::name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
