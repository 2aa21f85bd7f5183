pub mod api;
pub mod error;
pub mod slice;

use fxhash::FxHashSet;
use syn::Attribute;

/// Collects the trait names already listed in `#[derive(..)]` attributes.
///
/// Paths are reduced to their last segment so `serde::Serialize` and `Serialize` match.
pub fn derived_traits(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut names = FxHashSet::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                names.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    names
}
