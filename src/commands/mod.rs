pub mod add;
pub mod annotate;
pub mod identity;
pub mod init;
pub mod relink;
pub mod view;

pub use add::run_add;
pub use annotate::{run_annotate, run_mark_read};
pub use identity::run_new_identity;
pub use init::run_init;
pub use relink::run_relink;
pub use view::{run_list, run_network, run_show, run_tagged, run_untagged};
