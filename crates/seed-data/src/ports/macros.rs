//! Helper macro for declaring gateway port error enums.
//!
//! Each variant gets a `thiserror` message and a snake-case constructor whose
//! parameters accept anything convertible into the field type, so adapters
//! can write `GatewayError::transport(err.to_string())` or
//! `GatewayError::status(503_u16, "unavailable")`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Builds the `", stringify!($variant), "` variant.")]
            pub const fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Builds the `", stringify!($variant), "` variant.")]
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
                $variant:ident $( {
                    $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
                } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $( $(#[$field_meta])* $field : $ty ),* } )?,
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
    //! Regression coverage for the generated constructors.

    define_port_error! {
        /// Errors used to exercise the macro.
        pub enum SamplePortError {
            /// Variant with a string field.
            Foo {
                /// Message.
                message: String,
            } => "foo: {message}",
            /// Variant with a numeric field.
            Bar {
                /// Count.
                count: u32,
            } => "bar: {count}",
            /// Variant with mixed fields.
            Baz {
                /// Message.
                message: String,
                /// Count.
                count: u32,
            } => "baz: {message} ({count})",
            /// Unit variant.
            Qux => "qux",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::foo("hello");
        assert_eq!(err.to_string(), "foo: hello");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = SamplePortError::bar(42_u32);
        assert_eq!(err.to_string(), "bar: 42");
    }

    #[test]
    fn constructors_support_mixed_fields_and_unit_variants() {
        assert_eq!(
            SamplePortError::baz("hello", 42_u32).to_string(),
            "baz: hello (42)"
        );
        assert_eq!(SamplePortError::qux(), SamplePortError::Qux);
    }
}
