use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

integer_id!(
    /// `producto_id` on the wire.
    ProductId
);
integer_id!(
    /// `categoria_id` on the wire.
    CategoryId
);
integer_id!(
    /// `cliente_id` on the wire.
    CustomerId
);
integer_id!(
    /// `usuario_id` on the wire; the seller recorded on a sale.
    UserId
);
integer_id!(
    /// `venta_id` on the wire.
    SaleId
);
