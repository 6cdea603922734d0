use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nsimage",
    about = "Offline checkpoint image inspection",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert an image to its XML rendering
    Xml(XmlArgs),
    /// Print the image summary without decoding section bodies
    Info(InfoArgs),
}

#[derive(Args)]
pub struct XmlArgs {
    /// Path to the image file
    pub image: PathBuf,

    /// Write the XML here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Path to the image file
    pub image: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_xml() {
        let cli = Cli::try_parse_from(["nsimage", "xml", "checkpoint.img"]).unwrap();
        if let Command::Xml(args) = cli.command {
            assert_eq!(args.image, PathBuf::from("checkpoint.img"));
            assert!(args.output.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_xml_with_output() {
        let cli =
            Cli::try_parse_from(["nsimage", "xml", "checkpoint.img", "-o", "out.xml"]).unwrap();
        if let Command::Xml(args) = cli.command {
            assert_eq!(args.output, Some(PathBuf::from("out.xml")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_info() {
        let cli = Cli::try_parse_from(["nsimage", "info", "checkpoint.img"]).unwrap();
        assert!(matches!(cli.command, Command::Info(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["nsimage", "-v", "info", "checkpoint.img"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn missing_image_rejected() {
        assert!(Cli::try_parse_from(["nsimage", "xml"]).is_err());
    }
}
