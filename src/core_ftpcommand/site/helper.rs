use crate::core_ftpcommand::reply;
use crate::session::Session;

/// Builds the body of a SITE reply: every line is prefixed with a newline so
/// the text starts under the reply code.
pub fn site_message<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines.into_iter().fold(String::new(), |mut message, line| {
        message.push('\n');
        message.push_str(line.as_ref());
        message
    })
}

pub async fn respond_with_lines<I, S>(session: &mut Session, lines: I) -> Result<(), std::io::Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let message = site_message(lines);
    session.reply(reply::COMMAND_OKAY, &message).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_message() {
        assert_eq!(site_message(["a : 1", "b : 2"]), "\na : 1\nb : 2");
        assert_eq!(site_message(Vec::<String>::new()), "");
    }
}
