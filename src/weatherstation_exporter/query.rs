// weatherstation_exporter - Prometheus metrics exporter for weather stations
//
// Copyright 2022 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use std::num::ParseFloatError;
use url::form_urlencoded;

/// Key-value pairs from a URL query string, in the order they were sent.
///
/// Parsing never fails. Pairs without a `=` or with an empty key or value are dropped,
/// `+` is treated as a space, and percent escapes are decoded with invalid UTF-8 replaced.
/// Keys may repeat, weather stations don't do this in practice but we keep every pair
/// around so that lookups are well defined: the first occurrence wins.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let pairs = form_urlencoded::parse(query.as_bytes())
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        QueryParams { pairs }
    }

    /// Value of the first pair with the given key, if any. Keys are case-sensitive.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Parse a single query value as a reading, ignoring surrounding whitespace.
pub fn parse_reading(raw: &str) -> Result<f64, ParseFloatError> {
    raw.trim().parse::<f64>()
}
