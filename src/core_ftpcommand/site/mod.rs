mod handler;

pub mod helper;
pub mod site_descuser;
pub mod site_help;
pub mod site_stat;
pub mod site_who;
pub mod site_zone;

pub use handler::Site;
pub use site_descuser::SiteDescuser;
pub use site_help::SiteHelp;
pub use site_stat::SiteStat;
pub use site_who::SiteWho;
pub use site_zone::SiteZone;
