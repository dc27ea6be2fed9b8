//! `pick-admin`: operator tooling for image keys, uploads and menu ingestion
//!
//! Upload and ingest commands work against a local bucket directory and a
//! JSON menu table, publishing URLs under the configured storage origin.

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pick_catalog::{
    find_brand, resolve_menu_image, AssetKind, AssetUploader, BatchReport, BucketProbe,
    CatalogConfig, DisplayImage, FsBlobStore, InMemoryBlobStore, JsonRowStore, MenuIngest,
    MenuRecord, UploadFailure, UploadFile,
};
use pick_key::{
    brand_candidate_keys, candidate_keys, derive_logo_key, derive_menu_key,
    derive_menu_key_for_file, MENU_EXTENSION,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match run(&matches).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn bucket_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("bucket-dir")
            .long("bucket-dir")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Directory standing in for the storage bucket"),
    )
}

fn cli() -> Command {
    Command::new("pick-admin")
        .version(pick_catalog::VERSION)
        .about("ChickenPick image keys, uploads and menu ingestion")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML config file (storage origin, bucket)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("key")
                .about("Print the menu image key for an identifier")
                .arg(Arg::new("identifier").required(true))
                .arg(
                    Arg::new("file")
                        .long("file")
                        .action(ArgAction::SetTrue)
                        .help("Treat the identifier as a file name and drop its extension"),
                ),
        )
        .subcommand(
            Command::new("logo-key")
                .about("Print the logo key for a logo file name")
                .arg(Arg::new("file-name").required(true)),
        )
        .subcommand(
            Command::new("candidates")
                .about("List menu image candidate keys in priority order")
                .arg(Arg::new("identifier").required(true))
                .arg(
                    Arg::new("brand")
                        .long("brand")
                        .help("Brand id used for prefix stripping"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("brand-candidates")
                .about("List logo candidate keys for a brand")
                .arg(Arg::new("brand").required(true))
                .arg(
                    Arg::new("korean")
                        .long("korean")
                        .help("Korean name for brands missing from the registry"),
                ),
        )
        .subcommand(bucket_args(
            Command::new("upload-images")
                .about("Re-encode menu photos to WebP and store them under derived keys")
                .arg(
                    Arg::new("files")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf)),
                ),
        ))
        .subcommand(bucket_args(
            Command::new("upload-logos")
                .about("Store brand logos under derived keys")
                .arg(
                    Arg::new("files")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf)),
                ),
        ))
        .subcommand(
            Command::new("ingest")
                .about("Upsert menu rows from CSV exports into a JSON table")
                .arg(
                    Arg::new("table")
                        .long("table")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON menu table file"),
                )
                .arg(
                    Arg::new("csv")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(bucket_args(
            Command::new("resolve")
                .about("Show which image a menu row would display")
                .arg(Arg::new("identifier").required(true))
                .arg(Arg::new("brand").long("brand").help("Brand id of the row"))
                .arg(
                    Arg::new("image-url")
                        .long("image-url")
                        .help("Stored absolute image URL of the row"),
                ),
        ))
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<CatalogConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CatalogConfig::new(),
    };
    Ok(config.with_env_overrides()?)
}

fn arg<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing argument <{name}>"))
}

fn opt_arg<'a>(args: &'a ArgMatches, name: &str) -> &'a str {
    args.get_one::<String>(name).map_or("", String::as_str)
}

fn path_arg<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing argument <{name}>"))
}

fn paths_arg(args: &ArgMatches, name: &str) -> Vec<PathBuf> {
    args.get_many::<PathBuf>(name)
        .map(|v| v.cloned().collect())
        .unwrap_or_default()
}

/// Run the selected command; `Ok(false)` when some item failed
async fn run(matches: &ArgMatches) -> anyhow::Result<bool> {
    let config = load_config(matches)?;

    match matches.subcommand() {
        Some(("key", args)) => {
            let identifier = arg(args, "identifier")?;
            let key = if args.get_flag("file") {
                derive_menu_key_for_file(identifier)
            } else {
                derive_menu_key(identifier)
            };
            println!("{key}");
            Ok(true)
        }
        Some(("logo-key", args)) => {
            let key = derive_logo_key(arg(args, "file-name")?)?;
            println!("{key}");
            Ok(true)
        }
        Some(("candidates", args)) => {
            let keys = candidate_keys(arg(args, "identifier")?, opt_arg(args, "brand"));
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&keys.keys(MENU_EXTENSION))?);
            } else {
                for candidate in keys.iter() {
                    println!("{}.{MENU_EXTENSION}\t{}", candidate.digest, candidate.variant);
                }
            }
            Ok(true)
        }
        Some(("brand-candidates", args)) => {
            let brand = arg(args, "brand")?;
            let keys = match (find_brand(brand), args.get_one::<String>("korean")) {
                (_, Some(korean)) => brand_candidate_keys(brand.trim(), korean),
                (Some(record), None) => record.logo_candidates(),
                (None, None) => brand_candidate_keys(brand.trim(), ""),
            };
            for key in keys {
                println!("{key}");
            }
            Ok(true)
        }
        Some(("upload-images", args)) => {
            let store = Arc::new(FsBlobStore::new(path_arg(args, "bucket-dir")?, config.storage));
            let (files, mut report) = read_files(&paths_arg(args, "files"), AssetKind::Menu).await;
            report.merge(AssetUploader::new(store).upload_menu_images(files).await);
            print_report("Menu Image Upload", &report);
            Ok(report.is_success())
        }
        Some(("upload-logos", args)) => {
            let store = Arc::new(FsBlobStore::new(path_arg(args, "bucket-dir")?, config.storage));
            let (files, mut report) = read_files(&paths_arg(args, "files"), AssetKind::Logo).await;
            report.merge(AssetUploader::new(store).upload_logos(files).await);
            print_report("Logo Upload", &report);
            Ok(report.is_success())
        }
        Some(("ingest", args)) => ingest(&config, args).await,
        Some(("resolve", args)) => {
            let store = Arc::new(FsBlobStore::new(path_arg(args, "bucket-dir")?, config.storage));
            let mut record = MenuRecord::new(arg(args, "identifier")?, opt_arg(args, "brand"));
            record.image_url = args.get_one::<String>("image-url").cloned();
            let probe = BucketProbe::new(store.clone());
            let shown = resolve_menu_image(&record, store.as_ref(), &probe).await;
            println!("{}", serde_json::to_string_pretty(&shown)?);
            Ok(matches!(shown, DisplayImage::Image { .. }))
        }
        Some((other, _)) => bail!("unknown command '{other}'"),
        None => bail!("no command given"),
    }
}

async fn ingest(config: &CatalogConfig, args: &ArgMatches) -> anyhow::Result<bool> {
    let blobs = Arc::new(InMemoryBlobStore::new(config.storage.clone()));
    let rows = Arc::new(JsonRowStore::new(path_arg(args, "table")?));
    let ingest = MenuIngest::new(blobs, rows);

    let mut success = 0usize;
    let mut failures = Vec::new();
    for path in paths_arg(args, "csv") {
        let result = match tokio::fs::read_to_string(&path).await {
            Ok(text) => ingest.ingest_csv(&text).await.map_err(anyhow::Error::from),
            Err(e) => Err(anyhow::Error::from(e)),
        };
        match result {
            Ok(report) => {
                tracing::info!(file = %path.display(), upserted = report.upserted, skipped = report.skipped, "ingested");
                success += report.upserted;
            }
            Err(e) => {
                let message = format!("[csv] {}: {e:#}", path.display());
                tracing::warn!("{message}");
                failures.push(message);
            }
        }
    }

    println!("CSV Ingest Report:");
    println!("  success: {success}");
    println!("  fail: {}", failures.len());
    for failure in &failures {
        println!("  {failure}");
    }
    Ok(failures.is_empty())
}

/// Read every path; unreadable files become failures of the returned report
async fn read_files(paths: &[PathBuf], kind: AssetKind) -> (Vec<UploadFile>, BatchReport) {
    let mut files = Vec::with_capacity(paths.len());
    let mut report = BatchReport::default();
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match tokio::fs::read(path).await {
            Ok(bytes) => files.push(UploadFile::new(name, bytes)),
            Err(e) => report.failures.push(UploadFailure {
                kind,
                file_name: name,
                message: format!("read failed: {e}"),
                encode_failure: false,
            }),
        }
    }
    (files, report)
}

fn print_report(title: &str, report: &BatchReport) {
    println!("{title} Report:");
    println!("  success: {}", report.succeeded());
    println!("  fail: {}", report.failed());
    for asset in &report.stored {
        println!("  {} -> {}", asset.file_name, asset.url);
    }
    for failure in &report.failures {
        println!("  {failure}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pick_test_utils::{png_bytes, svg_logo};

    fn parse(args: &[&str]) -> ArgMatches {
        cli().try_get_matches_from(args).unwrap()
    }

    #[tokio::test]
    async fn key_commands_succeed() {
        assert!(run(&parse(&["pick-admin", "key", "양념치킨, "])).await.unwrap());
        assert!(run(&parse(&["pick-admin", "key", "--file", "a.jpg"])).await.unwrap());
        assert!(run(&parse(&["pick-admin", "candidates", "bbq_treat", "--brand", "bbq", "--json"]))
            .await
            .unwrap());
        assert!(run(&parse(&["pick-admin", "brand-candidates", "kyochon"])).await.unwrap());
    }

    #[tokio::test]
    async fn logo_key_without_extension_is_an_error() {
        assert!(run(&parse(&["pick-admin", "logo-key", "bbq"])).await.is_err());
    }

    #[test]
    fn upload_requires_bucket_dir() {
        assert!(cli()
            .try_get_matches_from(["pick-admin", "upload-images", "a.png"])
            .is_err());
    }

    #[tokio::test]
    async fn upload_then_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("양념치킨.png");
        let logo = dir.path().join("bbq.svg");
        std::fs::write(&photo, png_bytes(4, 4)).unwrap();
        std::fs::write(&logo, svg_logo("BBQ")).unwrap();
        let bucket = dir.path().join("bucket");
        let bucket = bucket.to_str().unwrap();

        let ok = run(&parse(&[
            "pick-admin",
            "upload-images",
            "--bucket-dir",
            bucket,
            photo.to_str().unwrap(),
        ]))
        .await
        .unwrap();
        assert!(ok);
        assert!(dir.path().join("bucket").join("2722952cc770d444.webp").exists());

        let ok = run(&parse(&["pick-admin", "upload-logos", "--bucket-dir", bucket, logo.to_str().unwrap()]))
            .await
            .unwrap();
        assert!(ok);
        assert!(dir.path().join("bucket").join("brand_bbq.svg").exists());

        let found = run(&parse(&["pick-admin", "resolve", "양념치킨", "--bucket-dir", bucket]))
            .await
            .unwrap();
        assert!(found);
    }

    #[tokio::test]
    async fn missing_upload_file_fails_batch() {
        let dir = tempfile::tempdir().unwrap();
        let bucket = dir.path().join("bucket");
        let missing = dir.path().join("nope.png");
        let ok = run(&parse(&[
            "pick-admin",
            "upload-images",
            "--bucket-dir",
            bucket.to_str().unwrap(),
            missing.to_str().unwrap(),
        ]))
        .await
        .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn ingest_writes_table() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("menus.csv");
        std::fs::write(&csv, pick_test_utils::SAMPLE_MENU_CSV).unwrap();
        let table = dir.path().join("menus.json");

        let ok = run(&parse(&[
            "pick-admin",
            "ingest",
            "--table",
            table.to_str().unwrap(),
            csv.to_str().unwrap(),
        ]))
        .await
        .unwrap();
        assert!(ok);
        let rows: Vec<MenuRecord> =
            serde_json::from_slice(&std::fs::read(&table).unwrap()).unwrap();
        assert_eq!(rows.len(), 3);
    }
}
