// Here's the list of the FTP commands implemented
pub mod abor;
pub mod acct;
pub mod auth;
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod feat;
pub mod help;
pub mod list;
pub mod mdtm;
pub mod mfmt;
pub mod mkd;
pub mod mode;
pub mod noop;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod size;
pub mod stat;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// Sub-dispatched commands
pub mod opts;
pub mod site;

// Parsing, dispatch and reply codes
pub mod ftpcommand;
pub mod handlers;
pub mod reply;
