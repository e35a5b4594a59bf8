// src/cli/status.rs — System status display

use crate::infra::config::Config;
use crate::infra::paths;
use crate::provider::ollama::OllamaProvider;

pub async fn show_status(config: &Config) -> anyhow::Result<()> {
    let db_path = paths::db_path();
    let config_path = paths::config_file_path();

    println!("tripmate v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if config_path.exists() {
        println!("  Config:     {} (loaded)", config_path.display());
    } else {
        println!("  Config:     (using defaults)");
    }

    if db_path.exists() {
        let size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
        println!("  Database:   {} ({})", db_path.display(), format_bytes(size));
    } else {
        println!("  Database:   (not initialized)");
    }

    println!(
        "  Chat:       {} turns kept, model timeout {}s",
        config.chat.history_capacity, config.model.timeout_seconds
    );

    let provider = OllamaProvider::from_config(&config.model)?;
    print!("  Model:      {} @ {} ... ", config.model.name, config.model.base_url);
    let _ = std::io::Write::flush(&mut std::io::stdout());
    match provider.probe().await {
        Ok(models) if models.iter().any(|m| m == &config.model.name) => println!("OK"),
        Ok(models) => {
            println!("NOT PULLED");
            if !models.is_empty() {
                println!("              available: {}", models.join(", "));
            }
            println!("              run `ollama pull {}`", config.model.name);
        }
        Err(e) => println!("UNREACHABLE ({e})"),
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
