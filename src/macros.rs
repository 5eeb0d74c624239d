//===========================================================================//

macro_rules! invalid_format {
    ($e:expr) => {
        return Err($crate::error::IcoError::InvalidFormat(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::InvalidFormat(
            format!($fmt, $($arg)+),
        ))
    };
}

macro_rules! truncated {
    ($needed:expr, $available:expr) => {
        return Err($crate::error::ImageError::Truncated {
            needed: $needed,
            available: $available,
        })
    };
}

//===========================================================================//
