/// Declare a builder for a single kind as a newtype over `ResourceBuilder`.
/// Lifecycle calls are reached through `Deref`.
macro_rules! resource_builder {
    ($(#[$meta:meta])* $name:ident, $spec:ty) => {
        $(#[$meta])*
        pub struct $name<C>($crate::ResourceBuilder<$spec, C>);

        impl<C> std::ops::Deref for $name<C> {
            type Target = $crate::ResourceBuilder<$spec, C>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<C> std::ops::DerefMut for $name<C> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl<C> From<$crate::ResourceBuilder<$spec, C>> for $name<C> {
            fn from(builder: $crate::ResourceBuilder<$spec, C>) -> Self {
                Self(builder)
            }
        }

        impl<C> std::fmt::Debug for $name<C> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Debug::fmt(&self.0, f)
            }
        }
    };
}
