//! GraphQL views of the domain types. All fields are declared nullable to
//! keep the schema that existing clients were written against, even though
//! the gateway always fills in defaults.

use juniper::graphql_object;

use crate::model::{Country, Flag};
use super::Context;


#[graphql_object(context = Context)]
impl Country {
    /// The common name of the country.
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    /// List of capital cities.
    fn capital(&self) -> Option<Vec<Option<&str>>> {
        Some(self.capital.iter().map(|c| Some(c.as_str())).collect())
    }

    /// Population of the country, `0` if unknown.
    fn population(&self) -> Option<i32> {
        // Decoding rejects populations outside of the `Int` range.
        i32::try_from(self.population).ok()
    }

    /// The geographic region (e.g. Europe, Africa).
    fn region(&self) -> Option<&str> {
        Some(&self.region)
    }

    /// The subregion (e.g. Southern Europe).
    fn subregion(&self) -> Option<&str> {
        Some(&self.subregion)
    }

    /// Flag images.
    fn flags(&self) -> Option<&Flag> {
        Some(&self.flags)
    }
}

/// Flag images of a country. Empty strings if upstream has none.
#[graphql_object(context = Context)]
impl Flag {
    /// URL of the PNG flag image.
    fn png(&self) -> Option<&str> {
        Some(&self.png)
    }

    /// URL of the SVG flag image.
    fn svg(&self) -> Option<&str> {
        Some(&self.svg)
    }
}
