/// Defines a ledger record: the struct itself (with getters, crate-visible
/// setters, a builder and serde support) plus the `created`/`updated`
/// timestamps every record carries.
#[macro_export]
macro_rules! ledger_model {
    (
        $(#[$struct_meta:meta])*
        pub struct $name:ident {
            $($fields:tt)*
        }
        $builder:ident

    ) => {
        $(#[$struct_meta])*
        #[derive(Clone, Debug, PartialEq, getset::Getters, getset::Setters, derive_builder::Builder, serde::Serialize, serde::Deserialize)]
        #[builder(pattern = "owned", setter(into))]
        #[getset(get = "pub", set = "pub(crate)")]
        pub struct $name {
            $($fields)*
            created: chrono::DateTime<chrono::Utc>,
            updated: chrono::DateTime<chrono::Utc>,
        }

        impl $name {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    }
}

/// A macro that standardizes including, exporting, and creating wrapper type(s)
/// for our ledger records.
macro_rules! load_models {
    (
        @pub mod
        $( ($path:ident, $model:ident), )*
    ) => {
        $(
            pub mod $path;
        )*
    };

    // create an enum that wraps our models in CUD, along with the conversions
    // needed to pull a concrete record back out of it.
    (
        @pub enum $enumname:ident
        $( ($path:ident, $model:ident), )*
    ) => {
        /// An enum that allows returning *any* model type. This is mainly used
        /// along with [Op](enum.Op.html) to specify modifications (ie
        /// `[Op::Create, Currency]`).
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        pub enum $enumname {
            $(
                $model(crate::models::$path::$model),
            )*
        }

        $(
            impl From<crate::models::$path::$model> for $enumname {
                fn from(val: crate::models::$path::$model) -> Self {
                    $enumname::$model(val)
                }
            }

            impl std::convert::TryFrom<$enumname> for crate::models::$path::$model {
                type Error = crate::error::Error;

                fn try_from(val: $enumname) -> crate::error::Result<Self> {
                    match val {
                        $enumname::$model(model) => Ok(model),
                        #[allow(unreachable_patterns)]
                        _ => Err(crate::error::Error::WrongModelType),
                    }
                }
            }
        )*
    };

    // entry point
    ($($load_type:tt)*) => {
        load_models! {
            @$($load_type)*
            (creator, Creator),
            (currency, Currency),
            (balance, Balance),
        }
    };
}
