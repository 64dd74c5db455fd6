//! Defines helper macros for generating domain port error enums.
//!
//! Each variant gets a snake-case constructor whose arguments accept
//! `impl Into<FieldType>`, so adapters can write
//! `OrderSourceError::transport(error.to_string())` or pass a `&str` directly.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor and message coverage for generated port errors.

    define_port_error! {
        pub enum ProbeError {
            Closed => "probe closed",
            Upstream { message: String } => "upstream failed: {message}",
            Status { status: u16 } => "status {status}",
            Rejected { status: u16, message: String } => "rejected with {status}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_argumentless_constructors() {
        assert_eq!(ProbeError::closed(), ProbeError::Closed);
        assert_eq!(ProbeError::closed().to_string(), "probe closed");
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        let err = ProbeError::upstream("timeout");
        assert_eq!(err.to_string(), "upstream failed: timeout");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = ProbeError::status(503_u16);
        assert_eq!(err, ProbeError::Status { status: 503 });
    }

    #[test]
    fn mixed_fields_are_initialised_in_declaration_order() {
        let err = ProbeError::rejected(400_u16, "bad body");
        assert_eq!(err.to_string(), "rejected with 400: bad body");
    }
}
