//! Modal dialog fragments swapped into `#modal-container` via htmx.

mod add_operation;
mod project_delete;

use maud::{Markup, html};

pub use add_operation::{get_add_charge_modal, get_add_income_modal};
pub use project_delete::get_project_delete_modal;

/// Wrap modal content in the shared backdrop and dialog box markup.
fn modal_shell(title: &str, body: &Markup) -> Markup {
    html!(
        div
            id="modal"
            class="fixed inset-0 z-50 flex items-center justify-center
                bg-black/50"
            onclick="if (event.target === this)
                document.getElementById('modal-container').innerHTML = '';"
        {
            div class="w-full max-w-md p-6 space-y-4 rounded-lg shadow
                bg-white dark:bg-gray-800 dark:text-white"
            {
                header class="flex items-start justify-between"
                {
                    h2 class="text-lg font-bold" { (title) }

                    button
                        type="button"
                        class="font-bold cursor-pointer"
                        aria-label="Close"
                        onclick="document.getElementById('modal-container').innerHTML = '';"
                    {
                        "✕"
                    }
                }

                (body)
            }
        }
    )
}
