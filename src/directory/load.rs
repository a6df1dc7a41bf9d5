// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::path::Path;

use tokio::fs;
use tracing::info;

use crate::directory::ProviderDirectory;
use crate::Result;

impl ProviderDirectory {
    /// Loads a directory from a YAML file using the layout of the embedded nameserver list.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<ProviderDirectory> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let directory: ProviderDirectory = content.parse()?;
        info!(
            "Loaded {} nameservers of {} providers from '{}'.",
            directory.len(),
            directory.providers().count(),
            path.display()
        );

        Ok(directory)
    }
}
