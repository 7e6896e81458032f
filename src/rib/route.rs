use std::fmt;

use crate::types::errors::FibError;
use crate::types::{NextHop, Prefix};

//------------ RouteRecord ---------------------------------------------------

/// One line of a route dump: `<prefix>/<len>|<path>|<next-hop>`.
///
/// The prefix key is kept as it appears in the file, since the builder
/// groups records by that exact string. It is only parsed into a [Prefix]
/// for the record that wins its group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteRecord {
    pub prefix_key: String,
    pub path: Vec<String>,
    pub next_hop: NextHop,
    /// 1-based line number in the route file, 0 if unknown.
    pub line: u64,
}

impl RouteRecord {
    pub const FIELDS: usize = 3;

    /// Build a record from the `|`-separated fields of a line.
    pub fn from_fields<'a, I>(fields: I, line: u64) -> Result<Self, FibError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        let [prefix_key, path, next_hop] = fields.as_slice() else {
            return Err(FibError::MalformedRoute {
                line,
                reason: format!(
                    "expected {} fields, found {}",
                    Self::FIELDS,
                    fields.len()
                ),
            });
        };
        if next_hop.trim().is_empty() {
            return Err(FibError::MalformedRoute {
                line,
                reason: "empty next hop".to_string(),
            });
        }

        Ok(Self {
            prefix_key: prefix_key.to_string(),
            path: path.split_whitespace().map(str::to_string).collect(),
            next_hop: NextHop::from(*next_hop),
            line,
        })
    }

    /// The number of tokens in the path. A shorter path is a better route.
    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    /// Parse the prefix key. Errors carry the line number of this record.
    pub fn prefix(&self) -> Result<Prefix, FibError> {
        self.prefix_key.parse().map_err(|err| match err {
            FibError::MalformedRoute { reason, .. } => FibError::MalformedRoute {
                line: self.line,
                reason,
            },
            err => err,
        })
    }
}

impl std::str::FromStr for RouteRecord {
    type Err = FibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fields(s.split('|'), 0)
    }
}

impl fmt::Display for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.prefix_key,
            self.path.join(" "),
            self.next_hop
        )
    }
}
