use tradegraph_models::{AnalystCategory, GraphConfig, NodeId, SessionState};

use crate::error::RouteError;
use crate::router::Router;

/// Static shape of one session's graph: which analysts run, in what order,
/// and whether the scenario optimizer sits between them and the debate.
///
/// Fixed edges live here; conditional edges are delegated to [`Router`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphPlan {
    analysts: Vec<AnalystCategory>,
    scenario_analysis: bool,
}

impl GraphPlan {
    pub fn new(analysts: Vec<AnalystCategory>, scenario_analysis: bool) -> Self {
        Self {
            analysts,
            scenario_analysis,
        }
    }

    pub fn from_config(config: &GraphConfig) -> Self {
        Self::new(config.eligible_analysts(), config.scenario_analysis)
    }

    pub fn analysts(&self) -> &[AnalystCategory] {
        &self.analysts
    }

    pub fn entry(&self) -> NodeId {
        self.analysts
            .first()
            .map(|c| NodeId::Analyst(*c))
            .unwrap_or_else(|| self.after_analysts())
    }

    /// Every node that produces a contribution, in pipeline order.
    pub fn agent_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.analysts.iter().map(|c| NodeId::Analyst(*c)).collect();
        if self.scenario_analysis {
            nodes.push(NodeId::ScenarioOptimizer);
        }
        nodes.extend([
            NodeId::BullResearcher,
            NodeId::BearResearcher,
            NodeId::ResearchManager,
            NodeId::Trader,
            NodeId::RiskyAnalyst,
            NodeId::SafeAnalyst,
            NodeId::NeutralAnalyst,
            NodeId::RiskJudge,
        ]);
        nodes
    }

    /// Node to execute after `node`, given the state it left behind.
    pub fn next(
        &self,
        node: NodeId,
        state: &SessionState,
        router: &Router,
    ) -> Result<NodeId, RouteError> {
        match node {
            NodeId::Analyst(category) => {
                self.ensure_planned(category, node)?;
                Ok(router.tool_call_gate(category, state)?.node())
            }
            NodeId::Tools(category) => {
                self.ensure_planned(category, node)?;
                Ok(NodeId::Analyst(category))
            }
            NodeId::MsgClear(category) => self.after_clear(category),
            NodeId::ScenarioOptimizer => Ok(NodeId::BullResearcher),
            NodeId::BullResearcher | NodeId::BearResearcher => router.debate_transition(state),
            NodeId::ResearchManager => Ok(NodeId::Trader),
            NodeId::Trader => Ok(NodeId::RiskyAnalyst),
            NodeId::RiskyAnalyst | NodeId::SafeAnalyst | NodeId::NeutralAnalyst => {
                router.risk_transition(state)
            }
            NodeId::RiskJudge | NodeId::End => Ok(NodeId::End),
        }
    }

    fn after_clear(&self, category: AnalystCategory) -> Result<NodeId, RouteError> {
        let pos = self
            .analysts
            .iter()
            .position(|c| *c == category)
            .ok_or(RouteError::NotInPlan(NodeId::MsgClear(category)))?;
        Ok(self
            .analysts
            .get(pos + 1)
            .map(|c| NodeId::Analyst(*c))
            .unwrap_or_else(|| self.after_analysts()))
    }

    fn after_analysts(&self) -> NodeId {
        if self.scenario_analysis {
            NodeId::ScenarioOptimizer
        } else {
            NodeId::BullResearcher
        }
    }

    fn ensure_planned(&self, category: AnalystCategory, node: NodeId) -> Result<(), RouteError> {
        if self.analysts.contains(&category) {
            Ok(())
        } else {
            Err(RouteError::NotInPlan(node))
        }
    }
}
