use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use colored::Colorize;

use nsimage_dump::ImageXmlWriter;
use nsimage_image::Image;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Xml(args) => cmd_xml(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn cmd_xml(args: XmlArgs) -> anyhow::Result<()> {
    let mut image = Image::open(&args.image)
        .with_context(|| format!("opening image {}", args.image.display()))?;
    let section_count = image.summary().sections.len();

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            let mut writer = ImageXmlWriter::new(BufWriter::new(file));
            writer
                .write_image(&mut image)
                .with_context(|| format!("converting {}", args.image.display()))?;
            println!(
                "{} wrote {} ({} sections)",
                "✓".green().bold(),
                path.display().to_string().bold(),
                section_count
            );
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = ImageXmlWriter::new(BufWriter::new(stdout.lock()));
            writer
                .write_image(&mut image)
                .with_context(|| format!("converting {}", args.image.display()))?;
        }
    }
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let image = Image::open(&args.image)
        .with_context(|| format!("opening image {}", args.image.display()))?;
    let summary = image.summary();

    println!("{}", args.image.display().to_string().bold());
    println!("  Layout version: {}", summary.layout_version);
    println!("  On-disk version: {}", summary.ondisk_version);
    println!(
        "  Codec: {}",
        summary.codec.as_deref().filter(|c| !c.is_empty()).unwrap_or("none")
    );
    println!("  Sections: {}", summary.sections.len());
    let mut out = std::io::stdout().lock();
    for section in &summary.sections {
        let marker = if section.kind.is_some() {
            "".normal()
        } else {
            " (unrecognized, will be skipped)".yellow()
        };
        writeln!(
            out,
            "    {:<28} offset {:>10}  length {:>10}{}",
            section.name, section.offset, section.length, marker
        )?;
    }
    Ok(())
}
