//! Starter `public_html` template installation

use crate::{CoreError, Project, Result};
use std::path::{Path, PathBuf};

/// Template location relative to the stack root
const TEMPLATE_SUBDIR: [&str; 2] = ["demo-site-folder", "public_html"];

/// Locate the template directory
///
/// Looks under `STACK_HOME` first, then two levels above the executable.
pub fn find_template_source(stack_home: Option<&Path>, exe_dir: Option<&Path>) -> Result<PathBuf> {
    let candidates = [
        stack_home.map(Path::to_path_buf),
        exe_dir.map(|dir| dir.join("..").join("..")),
    ];

    candidates
        .into_iter()
        .flatten()
        .map(|root| TEMPLATE_SUBDIR.iter().fold(root, |p, part| p.join(part)))
        .find(|candidate| candidate.is_dir())
        .ok_or(CoreError::TemplateNotFound)
}

/// Copy the template into `<project>/public_html`, returning the number of files copied
pub fn install_template(project: &Project, source: &Path) -> Result<usize> {
    if !source.is_dir() {
        return Err(CoreError::TemplateNotFound);
    }

    let dest = project.public_html();
    std::fs::create_dir_all(&dest).map_err(|e| CoreError::TemplateCopy {
        path: dest.clone(),
        source: e,
    })?;

    let copied = copy_dir(source, &dest)?;
    tracing::debug!("Installed {} template files into {:?}", copied, dest);
    Ok(copied)
}

fn copy_dir(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let target = dst.join(entry.file_name());
        let metadata = entry.metadata()?;

        let copy_err = |e: std::io::Error| CoreError::TemplateCopy {
            path: target.clone(),
            source: e,
        };

        if metadata.is_dir() {
            std::fs::create_dir_all(&target).map_err(copy_err)?;
            copied += copy_dir(&path, &target)?;
            std::fs::set_permissions(&target, metadata.permissions()).map_err(copy_err)?;
        } else {
            std::fs::copy(&path, &target).map_err(copy_err)?;
            std::fs::set_permissions(&target, metadata.permissions()).map_err(copy_err)?;
            copied += 1;
        }
    }

    Ok(copied)
}
