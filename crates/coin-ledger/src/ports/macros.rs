//! `define_port_error!`: error enums for driven ports.
//!
//! Each variant gets a `thiserror` message and a snake-case constructor whose
//! parameters take `impl Into<FieldType>`, so adapters can write
//! `KeyValueStoreError::io(format!(..))` or `KeyValueStoreError::invalid_key(key)`
//! without spelling out the struct literal.

macro_rules! define_port_error {
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
                ::paste::paste! {
                    #[doc = concat!("Build a [`", stringify!($name), "::", stringify!($variant), "`].")]
                    #[must_use]
                    pub fn [<$variant:snake>]($( $( $field: impl Into<$ty> ),* )?) -> Self {
                        Self::$variant $( { $( $field: $field.into() ),* } )?
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Error shaped like a storage adapter's, used only here.
        pub enum SlotError {
            /// The backing medium is unavailable.
            Offline => "slot offline",
            /// The slot refused the value.
            Rejected {
                /// Why the value was refused.
                reason: String,
            } => "slot rejected value: {reason}",
            /// The value was larger than the slot allows.
            TooLarge {
                /// Slot name.
                slot: String,
                /// Bytes over the limit.
                excess: u64,
            } => "slot {slot} over limit by {excess} bytes",
        }
    }

    #[test]
    fn unit_variants_get_argument_free_constructors() {
        assert_eq!(SlotError::offline(), SlotError::Offline);
        assert_eq!(SlotError::offline().to_string(), "slot offline");
    }

    #[test]
    fn string_fields_accept_borrowed_text() {
        let err = SlotError::rejected("read only");
        assert_eq!(
            err,
            SlotError::Rejected {
                reason: "read only".to_owned()
            }
        );
        assert_eq!(err.to_string(), "slot rejected value: read only");
    }

    #[test]
    fn non_string_fields_keep_their_types() {
        let err = SlotError::too_large("coins", 512_u64);
        assert_eq!(err.to_string(), "slot coins over limit by 512 bytes");
    }
}
