//! Wire id assignment for services and methods.
//!
//! Ids are either pinned with an option (`option id = 4;`, or the namespaced
//! `option (hrpc.service) = 4;` / `option (hrpc.method) = 4;`) or allocated
//! by counting up from the last id produced in the same scope.

use hrpc_define::Options;

use crate::errors::GeneratorError;

/// Option key checked first for an explicit id.
pub const ID_OPTION: &str = "id";
/// Namespaced fallback key for service ids.
pub const SERVICE_ID_OPTION: &str = "hrpc.service";
/// Namespaced fallback key for method ids.
pub const METHOD_ID_OPTION: &str = "hrpc.method";

/// Sequential id allocator for one scope.
///
/// The allocator is a plain value: [`allocate`](Self::allocate) consumes it
/// and returns the successor state alongside the id.
///
/// ## Examples
///
/// ```
/// use hrpc_gen::ids::IdAllocator;
///
/// let ids = IdAllocator::new();
/// let (a, ids) = ids.allocate(None).unwrap();
/// let (b, ids) = ids.allocate(Some(10)).unwrap();
/// let (c, _) = ids.allocate(None).unwrap();
/// assert_eq!((a, b, c), (1, 10, 11));
///
/// let (_, ids) = ids.allocate(Some(u32::MAX)).unwrap();
/// assert_eq!(ids.allocate(None), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdAllocator {
    last: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently produced id, `0` before the first allocation.
    pub fn last(self) -> u32 {
        self.last
    }

    /// Produces the next id.
    ///
    /// An explicit id of `0` counts as absent. Returns `None` when an
    /// unpinned entry follows `u32::MAX`.
    pub fn allocate(self, explicit: Option<u32>) -> Option<(u32, IdAllocator)> {
        let id = match explicit {
            Some(id) if id != 0 => id,
            _ => self.last.checked_add(1)?,
        };
        Some((id, IdAllocator { last: id }))
    }
}

/// Reads an explicit id from `options`.
///
/// `id` takes precedence over `fallback_key`, but a zero `id` is skipped so
/// the fallback still applies. `target` names the annotated declaration in
/// the error.
///
/// ## Errors
///
/// Returns [`GeneratorError::InvalidId`] if the value is not an unsigned
/// 32-bit integer.
pub fn explicit_id(
    options: &Options,
    fallback_key: &str,
    target: &str,
) -> Result<Option<u32>, GeneratorError> {
    for key in [ID_OPTION, fallback_key] {
        let Some(raw) = options.get(key) else {
            continue;
        };
        match parse_id(raw) {
            Some(0) => continue,
            Some(id) => return Ok(Some(id)),
            None => {
                return Err(GeneratorError::InvalidId {
                    target: target.to_string(),
                    value: raw.to_string(),
                });
            }
        }
    }
    Ok(None)
}

fn parse_id(raw: &str) -> Option<u32> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        raw.parse().ok()
    }
}
