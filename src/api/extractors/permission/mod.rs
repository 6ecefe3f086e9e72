/*!
 * Permission-gated extractor
 *
 * Public API:
 * - Authorized<P>
 * - Permission と各権限タグ型
 */

mod core;
mod types;

pub use self::core::Authorized;
pub use self::types::*;
