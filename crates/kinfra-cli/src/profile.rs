use anyhow::Result;
use clap::Args;

use kinfra_types::profile::Profile;
use kinfra_types::profile::ProfileCatalog;

#[derive(Debug, Args)]
pub struct ProfileOpt {
    /// Profile name, lists known profiles when omitted
    pub name: Option<String>,
}

impl ProfileOpt {
    pub fn process(&self) -> Result<()> {
        let catalog = ProfileCatalog::builtin();
        match self.lookup(&catalog)? {
            Some(profile) => print!("{}", serde_yaml::to_string(profile)?),
            None => {
                for name in catalog.names() {
                    println!("{name}");
                }
            }
        }
        Ok(())
    }

    fn lookup<'a>(&self, catalog: &'a ProfileCatalog) -> Result<Option<&'a Profile>> {
        match &self.name {
            Some(name) => Ok(Some(catalog.get(name)?)),
            None => Ok(None),
        }
    }
}
