// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Lists every state machine the caller can see.

use crate::aws::StepFunctionsService;
use crate::error::Result;
use crate::model::StateMachineRef;
use log::{debug, info};

/// Returns the ARNs of all state machines visible to the caller's
/// credentials, in service order, following pagination to the end.
pub async fn list_state_machines<S>(service: &S) -> Result<Vec<StateMachineRef>>
where
    S: StepFunctionsService + ?Sized,
{
    let mut machines = vec![];
    let mut next_token = None;
    let mut pages = 0;

    loop {
        let page = service.list_state_machines(next_token.take()).await?;
        pages += 1;
        machines.extend(page.items);
        match page.next_token {
            Some(token) => {
                debug!("Fetching state machine page {}", pages + 1);
                next_token = Some(token);
            }
            None => break,
        }
    }

    info!("Found {} state machines in {} pages", machines.len(), pages);
    Ok(machines)
}
