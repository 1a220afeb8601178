use std::ffi::OsString;
use std::path::PathBuf;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Description files loaded at startup, each adding one root per
    /// resource block.
    #[arg(value_name = "WADL")]
    wadl: Vec<PathBuf>,

    /// Profile name
    /// Section of the profile file to read defaults from. Default is 'default'.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    #[clap(short = 'e', long, help = "editor command run on request payloads")]
    editor: Option<String>,

    #[clap(long, help = "scratch file used for request payloads")]
    payload_file: Option<PathBuf>,

    #[clap(short = 'v', long, help = "debug logging to stderr")]
    verbose: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    wadl: Vec<PathBuf>,
    profile: String,
    editor: Option<String>,
    payload_file: Option<PathBuf>,
    verbose: bool,
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            wadl: args.wadl,
            profile: args.profile,
            editor: args.editor,
            payload_file: args.payload_file,
            verbose: args.verbose,
        }
    }
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }

    pub fn wadl(&self) -> &[PathBuf] {
        &self.wadl
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn editor(&self) -> Option<&str> {
        self.editor.as_deref()
    }

    pub fn payload_file(&self) -> Option<&PathBuf> {
        self.payload_file.as_ref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_args_profile_only() {
        let args = CommandLineArgs::parse_from(["program", "--profile", "test"]);
        assert_eq!(args.profile(), "test");
    }

    #[test]
    fn test_parse_args_short_flags() {
        let args = CommandLineArgs::parse_from(["program", "-p", "dev", "-e", "vim", "-v"]);
        assert_eq!(args.profile(), "dev");
        assert_eq!(args.editor(), Some("vim"));
        assert!(args.verbose());
    }

    #[test]
    fn test_parse_args_files_and_payload() {
        let args = CommandLineArgs::parse_from([
            "program",
            "shop.wadl",
            "billing.wadl",
            "--payload-file",
            "/tmp/body.xml",
            "--editor",
            "code --wait",
        ]);
        assert_eq!(
            args.wadl(),
            &[PathBuf::from("shop.wadl"), PathBuf::from("billing.wadl")]
        );
        assert_eq!(args.payload_file(), Some(&PathBuf::from("/tmp/body.xml")));
        assert_eq!(args.editor(), Some("code --wait"));
    }

    #[test]
    fn test_default_values() {
        let args = CommandLineArgs::parse_from(["program"]);
        assert_eq!(args.profile(), "default");
        assert!(args.wadl().is_empty());
        assert_eq!(args.editor(), None);
        assert_eq!(args.payload_file(), None);
        assert!(!args.verbose());
    }
}
