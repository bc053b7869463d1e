use std::fmt;

/// Which surface an operation entered through; recorded on every audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    API,
    CLI,
}

impl fmt::Display for RequestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::API => "API",
            Self::CLI => "CLI",
        })
    }
}
