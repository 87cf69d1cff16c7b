//! Items that define the domain data model, independent of the GraphQL API
//! and the upstream wire format.

mod country;

pub(crate) use self::country::{Country, Flag};
