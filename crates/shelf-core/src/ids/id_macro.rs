//! Common macro for implementing integer ID wrapper types.

macro_rules! impl_id {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                pub const fn new(value: i32) -> Self {
                    Self(value)
                }

                pub const fn get(self) -> i32 {
                    self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<i32> for $name {
                fn from(value: i32) -> Self {
                    Self(value)
                }
            }

            impl From<$name> for i32 {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )*
    };
}

pub(crate) use impl_id;
