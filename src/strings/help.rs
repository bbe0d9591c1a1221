//! # Help Text
//!
//! Help messages for bot commands.
//! Displayed to the user via the `.help` command.

pub const MAIN: &str = concat!(
    "**🔎 Scout Help**\n",
    "Use: .command _args_\n",
    "\n",
    "**📚 Search**\n",
    "* books [query]: Search Open Library\n",
    "* music [query]: Search songs on iTunes\n",
    "\n",
    "**🧭 Browsing**\n",
    "Results open one at a time. React with ◀️ / ▶️ to page through them.\n",
    "Only the person who searched can page; controls expire after a while.\n",
    "\n",
    "**⚡ Misc**\n",
    "* help\n"
);
