//! `docquery onboard` — Write a default config file.

use docquery_config::AppConfig;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = super::config_path(config_path);

    println!("DocQuery — First-Time Setup");
    println!("===========================\n");

    if write_default(&path)? {
        println!("✅ Created config at: {}", path.display());
        println!("\n📝 Next steps:");
        println!("   1. Set vector_store.url (or WEAVIATE_URL) to your Weaviate cluster");
        println!("   2. Set api_key (or OPENAI_API_KEY)");
        println!("   3. Run: docquery doctor");
        println!("   4. Run: docquery ask \"What is a decision tree?\"\n");
    } else {
        println!("⚠️  Config already exists at: {}", path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    }

    Ok(())
}

/// Write the default config to `path` unless a file is already there.
/// Returns whether a file was written.
fn write_default(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, AppConfig::default_toml())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_loadable_default_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(write_default(&path).unwrap());
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.vector_store.collection, "ScikitLearnDocumentation");

        std::fs::write(&path, "model = \"gpt-4o\"\n").unwrap();
        assert!(!write_default(&path).unwrap());
        assert_eq!(AppConfig::load_from(&path).unwrap().model, "gpt-4o");
    }
}
