//! Tiny macro for forwarding arithmetic operator impls to a transparent i64 newtype.

#[macro_export]
macro_rules! op {
    (binary $t:ty, $trait:ident, $method:ident) => {
        impl std::ops::$trait for $t {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self::from(std::ops::$trait::$method(self.value(), rhs.value()))
            }
        }
    };
    (inplace $t:ty, $trait:ident, $method:ident) => {
        impl std::ops::$trait for $t {
            fn $method(&mut self, rhs: Self) {
                let mut value = self.value();
                std::ops::$trait::$method(&mut value, rhs.value());
                *self = Self::from(value);
            }
        }
    };
    (unary $t:ty, $trait:ident, $method:ident) => {
        impl std::ops::$trait for $t {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self::from(std::ops::$trait::$method(self.value()))
            }
        }
    };
}
