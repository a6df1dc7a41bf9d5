// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use serde::Serialize;

use crate::RecordType;

/// One query to execute: `record_type` for `name` sent to `server` of `provider`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryTarget {
    provider: String,
    server: String,
    record_type: RecordType,
    name: String,
}

impl QueryTarget {
    pub fn new<P: Into<String>, S: Into<String>, N: Into<String>>(
        provider: P,
        server: S,
        record_type: RecordType,
        name: N,
    ) -> QueryTarget {
        QueryTarget {
            provider: provider.into(),
            server: server.into(),
            record_type,
            name: name.into(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_provider_server(self) -> (String, String) {
        (self.provider, self.server)
    }
}

impl fmt::Display for QueryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @{} ({})",
            self.name, self.record_type, self.server, self.provider
        )
    }
}
