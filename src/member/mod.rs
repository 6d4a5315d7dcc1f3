//! Project members, the people a household budget tracks spending for.

mod create;
mod db;
mod delete;
pub(crate) mod domain;
mod edit;

pub use create::create_member_endpoint;
pub use db::{
    create_member, create_member_table, delete_member, get_member, get_members_by_project,
    rename_member,
};
pub use delete::delete_member_endpoint;
pub use domain::{Member, MemberId, MemberName};
pub use edit::{get_edit_member_page, update_member_endpoint};
