/// Implements conversions between [crate::specs::Spec] and the struct wrapped by each of the
/// given variants. Each variant must wrap a struct of the same name.
///
/// Borrowing conversion from the enum fails with [crate::specs::WrongSpecType].
#[macro_export(local_inner_macros)]
macro_rules! impl_spec_conversions {
    ($($variant_and_type:ident),+ $(,)?) => {
        $(
            impl<'a> TryFrom<&'a $crate::specs::Spec> for &'a $variant_and_type {
                type Error = $crate::specs::WrongSpecType;

                fn try_from(
                    value: &'a $crate::specs::Spec,
                ) -> ::std::result::Result<Self, Self::Error> {
                    match value {
                        $crate::specs::Spec::$variant_and_type(variant_value) => Ok(variant_value),
                        _ => Err($crate::specs::WrongSpecType {
                            expected: $crate::specs::SpecDiscriminants::$variant_and_type,
                            got: value.into(),
                        }),
                    }
                }
            }

            impl ::std::convert::From<$variant_and_type> for $crate::specs::Spec {
                fn from(value: $variant_and_type) -> $crate::specs::Spec {
                    $crate::specs::Spec::$variant_and_type(value)
                }
            }
        )+
    };
}
