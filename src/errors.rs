#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorType {
    /// The platform text-composition service failed while a text box was focused.
    TextComposition,
    /// A push/pop pair (id, clip, container or layout) was left unbalanced at the end of a frame.
    StackImbalance,
    /// A typed numeric value could not be parsed; the field falls back to zero.
    InvalidNumber,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{type_:?}: {text}")]
pub struct Error {
    pub type_: ErrorType,
    pub text: String,
}

impl Error {
    pub fn new(type_: ErrorType, text: impl Into<String>) -> Self {
        Self {
            type_,
            text: text.into(),
        }
    }

    pub fn composition(text: impl Into<String>) -> Self {
        Self::new(ErrorType::TextComposition, text)
    }
}
