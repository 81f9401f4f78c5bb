//! Installed package enumeration.

use std::path::PathBuf;

use crate::error::{GuardError, GuardResult};

use super::PackageSource;


/// An installed package and the UID it runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub uid: u32,
    pub package_name: String,
    pub app_name: String,
}


/// Reads the package manager's `packages.list` (`name uid debuggable datadir ...`).
///
/// The file carries no display labels, so the package name doubles as the app name.
pub struct PackagesList {
    path: PathBuf,
}


impl PackagesList {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}


impl PackageSource for PackagesList {
    fn installed_packages(&self) -> GuardResult<Vec<InstalledPackage>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| GuardError::PackageRead {
            path: self.path.clone(),
            details: e.to_string(),
        })?;

        parse_packages_list(&content).map_err(|details| GuardError::PackageRead {
            path: self.path.clone(),
            details,
        })
    }
}


pub(crate) fn parse_packages_list(content: &str) -> Result<Vec<InstalledPackage>, String> {
    let mut packages = Vec::new();

    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(uid)) = (fields.next(), fields.next()) else {
            continue;
        };
        let uid: u32 = uid
            .parse()
            .map_err(|_| format!("invalid uid '{uid}' for {name}"))?;

        packages.push(InstalledPackage {
            uid,
            package_name: name.to_string(),
            app_name: name.to_string(),
        });
    }

    Ok(packages)
}
