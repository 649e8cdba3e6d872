use crate::constants::SUBCOMMAND_SEPARATOR;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::session::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core_ftpcommand::{
    abor, acct, auth, cdup, cwd, dele, feat, help, list, mdtm, mfmt, mkd, mode, noop, opts,
    pass, pwd, quit, retr, rmd, rnfr, rnto, site, size, stat, stor, syst, type_, user,
};

// Specific crates for PORT and PASV commands
use crate::core_network::pasv;
use crate::core_network::port;

/// A command implementation.
///
/// Handlers write their own replies. The returned error is reserved for a
/// broken control connection, which ends the session.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, session: &mut Session, request: &FtpRequest)
        -> std::io::Result<()>;
}

pub type HandlerMap = HashMap<String, Arc<dyn CommandHandler>>;

/// Verbs accepted before authentication.
pub const NON_AUTHENTICATED_COMMANDS: [&str; 7] =
    ["USER", "PASS", "AUTH", "PBSZ", "PROT", "FEAT", "QUIT"];

pub fn is_without_authentication_command(command: &str) -> bool {
    NON_AUTHENTICATED_COMMANDS.contains(&command)
}

/// Commands whose behaviour is selected by their first argument token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubNamespace {
    Opts,
    Site,
}

impl SubNamespace {
    pub fn prefix(&self) -> &'static str {
        match self {
            SubNamespace::Opts => "OPTS",
            SubNamespace::Site => "SITE",
        }
    }
}

/// Builds the lookup key of a sub-command, e.g. `SITE_WHO`.
pub fn compound_key(namespace: SubNamespace, sub_command: &str) -> String {
    format!(
        "{}{}{}",
        namespace.prefix(),
        SUBCOMMAND_SEPARATOR,
        sub_command.to_ascii_uppercase()
    )
}

/// Verb table plus the OPTS and SITE sub-tables. Built once per server.
pub struct CommandRegistry {
    commands: HandlerMap,
    opts: HandlerMap,
    site: HandlerMap,
}

impl CommandRegistry {
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
            opts: HashMap::new(),
            site: HashMap::new(),
        }
    }

    pub fn register(&mut self, verb: &str, handler: Arc<dyn CommandHandler>) {
        self.commands.insert(verb.to_ascii_uppercase(), handler);
    }

    pub fn register_sub(
        &mut self,
        namespace: SubNamespace,
        sub_command: &str,
        handler: Arc<dyn CommandHandler>,
    ) {
        let key = compound_key(namespace, sub_command);
        self.table_mut(namespace).insert(key, handler);
    }

    pub fn get(&self, verb: &str) -> Option<Arc<dyn CommandHandler>> {
        self.commands.get(verb).cloned()
    }

    pub fn get_sub(
        &self,
        namespace: SubNamespace,
        sub_command: &str,
    ) -> Option<Arc<dyn CommandHandler>> {
        self.table(namespace)
            .get(&compound_key(namespace, sub_command))
            .cloned()
    }

    /// Registered top-level verbs, sorted.
    pub fn verbs(&self) -> Vec<&str> {
        let mut verbs: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        verbs.sort_unstable();
        verbs
    }

    /// Registered sub-commands of `namespace` without their prefix, sorted.
    pub fn sub_commands(&self, namespace: SubNamespace) -> Vec<&str> {
        let skip = namespace.prefix().len() + SUBCOMMAND_SEPARATOR.len();
        let mut subs: Vec<&str> = self
            .table(namespace)
            .keys()
            .map(|k| &k[skip..])
            .collect();
        subs.sort_unstable();
        subs
    }

    fn table(&self, namespace: SubNamespace) -> &HandlerMap {
        match namespace {
            SubNamespace::Opts => &self.opts,
            SubNamespace::Site => &self.site,
        }
    }

    fn table_mut(&mut self, namespace: SubNamespace) -> &mut HandlerMap {
        match namespace {
            SubNamespace::Opts => &mut self.opts,
            SubNamespace::Site => &mut self.site,
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        initialize_command_handlers()
    }
}

pub fn initialize_command_handlers() -> CommandRegistry {
    let mut registry = CommandRegistry::empty();

    // Login and session
    registry.register("USER", Arc::new(user::User));
    registry.register("PASS", Arc::new(pass::Pass));
    registry.register("QUIT", Arc::new(quit::Quit));
    registry.register("ACCT", Arc::new(acct::Acct));
    registry.register("ALLO", Arc::new(acct::Allo));

    // Security negotiation
    registry.register("AUTH", Arc::new(auth::Auth));
    registry.register("PBSZ", Arc::new(auth::Pbsz));
    registry.register("PROT", Arc::new(auth::Prot));

    // Navigation
    registry.register("PWD", Arc::new(pwd::Pwd));
    registry.register("XPWD", Arc::new(pwd::Pwd));
    registry.register("CWD", Arc::new(cwd::Cwd));
    registry.register("XCWD", Arc::new(cwd::Cwd));
    registry.register("CDUP", Arc::new(cdup::Cdup));
    registry.register("XCUP", Arc::new(cdup::Cdup));

    // File management
    registry.register("SIZE", Arc::new(size::Size));
    registry.register("MDTM", Arc::new(mdtm::Mdtm));
    registry.register("MFMT", Arc::new(mfmt::Mfmt));
    registry.register("DELE", Arc::new(dele::Dele));
    registry.register("MKD", Arc::new(mkd::Mkd));
    registry.register("XMKD", Arc::new(mkd::Mkd));
    registry.register("RMD", Arc::new(rmd::Rmd));
    registry.register("XRMD", Arc::new(rmd::Rmd));
    registry.register("RNFR", Arc::new(rnfr::Rnfr));
    registry.register("RNTO", Arc::new(rnto::Rnto));

    // Transfers
    registry.register("RETR", Arc::new(retr::Retr));
    registry.register("STOR", Arc::new(stor::Stor::store()));
    registry.register("APPE", Arc::new(stor::Stor::append()));
    registry.register("LIST", Arc::new(list::List::long()));
    registry.register("NLST", Arc::new(list::List::names()));

    // Data channel
    registry.register("PORT", Arc::new(port::Port));
    registry.register("PASV", Arc::new(pasv::Pasv));
    registry.register("EPSV", Arc::new(pasv::Epsv));
    registry.register("ABOR", Arc::new(abor::Abor));

    // Transfer parameters
    registry.register("TYPE", Arc::new(type_::Type));
    registry.register("MODE", Arc::new(mode::Mode));
    registry.register("STRU", Arc::new(mode::Stru));

    // Informational
    registry.register("SYST", Arc::new(syst::Syst));
    registry.register("NOOP", Arc::new(noop::Noop));
    registry.register("FEAT", Arc::new(feat::Feat));
    registry.register("HELP", Arc::new(help::Help));
    registry.register("STAT", Arc::new(stat::Stat));

    // Sub-dispatchers
    registry.register("OPTS", Arc::new(opts::Opts));
    registry.register("SITE", Arc::new(site::Site));

    registry.register_sub(SubNamespace::Opts, "UTF8", Arc::new(opts::OptsUtf8));

    registry.register_sub(SubNamespace::Site, "DESCUSER", Arc::new(site::SiteDescuser));
    registry.register_sub(SubNamespace::Site, "HELP", Arc::new(site::SiteHelp));
    registry.register_sub(SubNamespace::Site, "STAT", Arc::new(site::SiteStat));
    registry.register_sub(SubNamespace::Site, "WHO", Arc::new(site::SiteWho));
    registry.register_sub(SubNamespace::Site, "ZONE", Arc::new(site::SiteZone));

    // Other commands here !

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list() {
        for verb in ["USER", "PASS", "QUIT", "AUTH", "FEAT"] {
            assert!(is_without_authentication_command(verb));
        }
        for verb in ["PWD", "LIST", "RETR", "SITE", ""] {
            assert!(!is_without_authentication_command(verb));
        }
    }

    #[test]
    fn test_compound_key() {
        assert_eq!(compound_key(SubNamespace::Site, "who"), "SITE_WHO");
        assert_eq!(compound_key(SubNamespace::Opts, "Utf8"), "OPTS_UTF8");
    }

    #[test]
    fn test_registry_lookups() {
        let registry = initialize_command_handlers();
        assert!(registry.get("USER").is_some());
        assert!(registry.get("XPWD").is_some());
        assert!(registry.get("REIN").is_none());
        assert!(registry.get("user").is_none());

        assert!(registry.get_sub(SubNamespace::Site, "who").is_some());
        assert!(registry.get_sub(SubNamespace::Opts, "UTF8").is_some());
        assert!(registry.get_sub(SubNamespace::Opts, "WHO").is_none());
        assert!(registry.get_sub(SubNamespace::Site, "UTF8").is_none());
    }

    #[test]
    fn test_sub_tables_do_not_leak_into_verbs() {
        let registry = initialize_command_handlers();
        assert!(registry.get("SITE_WHO").is_none());
        assert!(registry.verbs().iter().all(|v| !v.contains('_')));
        assert_eq!(
            registry.sub_commands(SubNamespace::Site),
            vec!["DESCUSER", "HELP", "STAT", "WHO", "ZONE"]
        );
    }
}
