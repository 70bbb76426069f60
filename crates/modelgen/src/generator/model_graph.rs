use std::collections::BTreeSet;

use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};

use crate::models::{MetaKind, MetaModel, MetaModelSet, ModelId};

/// Reference edges between the standalone models of a [`MetaModelSet`].
pub(crate) struct ModelGraph<'a> {
  models: &'a MetaModelSet,
  graph: DiGraphMap<ModelId, ()>,
}

impl<'a> ModelGraph<'a> {
  pub(crate) fn new(models: &'a MetaModelSet) -> Self {
    let mut graph = DiGraphMap::new();
    for entry in models.iter() {
      graph.add_node(entry.id);
      let mut targets = BTreeSet::new();
      collect_references(&entry.model, &mut targets);
      for target in targets {
        graph.add_edge(entry.id, target, ());
      }
    }
    Self { models, graph }
  }

  /// Groups of models that reach each other through references, named by model name and
  /// listed in entry order.
  pub(crate) fn detect_cycles(&self) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = kosaraju_scc(&self.graph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
      .map(|mut scc| {
        scc.sort_by_key(|id| self.models.position(*id));
        scc
          .into_iter()
          .filter_map(|id| self.models.get(id).map(|model| model.name.clone()))
          .collect()
      })
      .collect();
    cycles.sort();
    cycles
  }
}

fn collect_references(model: &MetaModel, targets: &mut BTreeSet<ModelId>) {
  match &model.kind {
    MetaKind::Reference(target) => {
      targets.insert(*target);
    }
    MetaKind::Object(object) => {
      for property in object.properties.values() {
        collect_references(&property.model, targets);
      }
    }
    MetaKind::Array(item) => collect_references(item, targets),
    MetaKind::Tuple(tuple) => {
      for value in tuple.values.iter().chain(tuple.rest.as_deref()) {
        collect_references(value, targets);
      }
    }
    MetaKind::Union(members) => {
      for member in members {
        collect_references(member, targets);
      }
    }
    MetaKind::Dictionary { key, value } => {
      collect_references(key, targets);
      collect_references(value, targets);
    }
    MetaKind::Enum(_)
    | MetaKind::String
    | MetaKind::Float
    | MetaKind::Integer
    | MetaKind::Boolean
    | MetaKind::Any => {}
  }
}
