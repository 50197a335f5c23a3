use anyhow::Result;
use vote_modules_api::{Context, WorkingSet};

use super::Ballot;

impl<C: Context> Ballot<C> {
    /// Initializes the module with its administrator and a zeroed tally.
    /// The admin identity is never written again after this point.
    pub(crate) fn init_module(
        &self,
        config: &<Self as vote_modules_api::Module>::Config,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<()> {
        self.admin.set(&config.admin, working_set);
        self.total_votes.set(&0, working_set);

        Ok(())
    }
}
