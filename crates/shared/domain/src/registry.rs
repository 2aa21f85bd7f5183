//! Type-erased registry entries for the initialized feature slices.

use std::any::{Any, TypeId};
use std::fmt::Debug;

/// Shared state of a feature slice (services plus their repositories).
pub trait FeatureSlice: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// A slice that finished its `init` and is ready to be mounted into the API state.
#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    pub name: &'static str,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>(), state: Box::new(state) }
    }

    /// Borrow the concrete slice state, if `T` is what was registered.
    #[must_use]
    pub fn downcast<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Rooms;

    impl FeatureSlice for Rooms {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Visits;

    impl FeatureSlice for Visits {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn downcast_matches_registered_type_only() {
        let slice = InitializedSlice::new(Rooms);
        assert_eq!(slice.id, TypeId::of::<Rooms>());
        assert!(slice.name.ends_with("Rooms"));
        assert!(slice.downcast::<Rooms>().is_some());
        assert!(slice.downcast::<Visits>().is_none());
    }
}
