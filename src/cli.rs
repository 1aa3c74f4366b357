use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["list", "host"])))]
pub struct Cli {
    /// outputs all groups and hostvars of the openITCOCKPIT inventory
    #[arg(long, action)]
    pub list: bool,

    /// outputs the variables of a single host
    #[arg(long, value_name = "NAME")]
    pub host: Option<String>,
}
