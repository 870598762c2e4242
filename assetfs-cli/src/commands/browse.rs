//! Commands that inspect single paths: `ls`, `stat` and `cat`.

use std::io::{self, Write};

use assetfs::pool::{ResourcePool, ResourceType};

use crate::error::CliError;

/// List a directory, one lower-cased name per line.
pub fn run_ls<P: ResourcePool + ?Sized>(vfs: &P, path: &str) -> Result<(), CliError> {
    let entries = list(vfs, path)?;
    let mut out = io::stdout().lock();
    for (name, kind) in entries {
        let marker = if kind.is_directory() { "/" } else { "" };
        writeln!(out, "{}{}", name, marker)?;
    }
    Ok(())
}

/// Print the resource type at `path`.
pub fn run_stat<P: ResourcePool + ?Sized>(vfs: &P, path: &str) -> Result<(), CliError> {
    println!("{}: {}", path, vfs.resource_type(path));
    Ok(())
}

/// Copy a file's bytes to stdout.
pub fn run_cat<P: ResourcePool + ?Sized>(vfs: &P, path: &str) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    copy_file(vfs, path, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn list<P: ResourcePool + ?Sized>(
    vfs: &P,
    path: &str,
) -> Result<Vec<(String, ResourceType)>, CliError> {
    match vfs.resource_type(path) {
        ResourceType::Directory => {}
        ResourceType::File => {
            return Err(CliError::WrongType {
                path: path.to_string(),
                expected: "directory",
            })
        }
        ResourceType::NonExistent => return Err(CliError::NotFound(path.to_string())),
    }

    let prefix = path.trim_end_matches(['/', '\\']);
    Ok(vfs
        .directory_content(path)
        .into_iter()
        .map(|name| {
            let child = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };
            let kind = vfs.resource_type(&child);
            (name, kind)
        })
        .collect())
}

fn copy_file<P: ResourcePool + ?Sized>(
    vfs: &P,
    path: &str,
    out: &mut dyn Write,
) -> Result<u64, CliError> {
    let Some(mut stream) = vfs.file_content(path) else {
        return Err(match vfs.resource_type(path) {
            ResourceType::NonExistent => CliError::NotFound(path.to_string()),
            _ => CliError::WrongType {
                path: path.to_string(),
                expected: "file",
            },
        });
    };
    Ok(io::copy(&mut stream, out)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetfs::pool::MemoryResourcePool;

    fn pool() -> MemoryResourcePool {
        let mut pool = MemoryResourcePool::new(true);
        pool.insert("Textures/Grass.dds", "grass");
        pool.insert("readme.txt", "read me");
        pool
    }

    #[test]
    fn test_list_marks_directories() {
        let pool = pool();
        let entries = list(&pool, "").unwrap();
        assert_eq!(
            entries,
            vec![
                ("Textures".to_string(), ResourceType::Directory),
                ("readme.txt".to_string(), ResourceType::File),
            ]
        );
    }

    #[test]
    fn test_list_rejects_files_and_missing() {
        let pool = pool();
        assert!(matches!(list(&pool, "readme.txt"), Err(CliError::WrongType { .. })));
        assert!(matches!(list(&pool, "nope"), Err(CliError::NotFound(_))));
    }

    #[test]
    fn test_copy_file() {
        let pool = pool();
        let mut out: Vec<u8> = Vec::new();
        let copied = copy_file(&pool, "Textures/Grass.dds", &mut out).unwrap();
        assert_eq!(copied, 5);
        assert_eq!(out, b"grass");

        assert!(matches!(
            copy_file(&pool, "Textures", &mut Vec::<u8>::new()),
            Err(CliError::WrongType { .. })
        ));
    }
}
