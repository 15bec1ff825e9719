use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XPathError {
    #[error("XPath parse error in '{0}': {1}")]
    XPathParse(String, String),

    #[error("Function '{function}' error: {message}")]
    FunctionError { function: String, message: String },

    #[error("Type error: {0}")]
    TypeError(String),
}

impl XPathError {
    pub fn function(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FunctionError {
            function: function.into(),
            message: message.into(),
        }
    }
}
