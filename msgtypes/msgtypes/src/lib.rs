//! The MSG toolkit core: parse text into a typed IR, normalize names,
//! accumulate parsed types into a shared [`TypeStore`], and compute either
//! of the two stable hash identifiers over it.
//!
//! ```
//! use msgtypes::TypeStore;
//!
//! let mut store = TypeStore::new();
//! msgtypes::parse_into(&mut store, "int32 x\n", "pkg/Foo").unwrap();
//!
//! let (text, md5_hex) = msgtypes::generate_msgdef(&store, "pkg/msg/Foo", true).unwrap();
//! assert_eq!(text, "int32 x\n");
//! let rihs = msgtypes::hash_rihs01(&store, "pkg/msg/Foo").unwrap();
//! assert!(rihs.starts_with("RIHS01_"));
//! # let _ = md5_hex;
//! ```

pub use msgtypes_core::{
    denormalize_fieldname, is_valid_fqn, normalize_fieldname, Basename, ConstDesc, ConstValue,
    FieldDesc, LeafType, MessageDescriptor, TypeStore, TypesysError,
};
pub use msgtypes_hash::{denormalize_msgtype, generate_msgdef, hash_rihs01};
pub use msgtypes_msg::{parse_all, parse_msg};

/// Parse a single MSG definition and merge its type dictionary into
/// `store`, preserving insertion order across repeated calls.
pub fn parse_into(
    store: &mut TypeStore,
    text: &str,
    typename: &str,
) -> Result<(), TypesysError> {
    let dict = parse_msg(text, typename)?;
    store.extend(dict);
    Ok(())
}
