//! board - Discussion board CLI
//!
//! Articles with hashtags derived from their content, threaded comments and
//! paged listings, stored in a local board file.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write an article as alice
//! board --user alice article create --title "Hello" --content "First post #rust"
//!
//! # Browse
//! board article list
//! board article search rust --by hashtag
//!
//! # Reply
//! board --user bob comment add 1 --content "Welcome!"
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
