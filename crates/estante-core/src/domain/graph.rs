use std::collections::HashMap;
use std::fmt;

use petgraph::Direction;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::domain::registry::Registry;

/// Peso de arista: `A → B` se lee "A fue influido por B".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfluenceEdge;

impl fmt::Display for InfluenceEdge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("influenced by")
  }
}

/// Grafo dirigido autor → influencia sobre nombres de autor.
///
/// Los nodos nunca se eliminan. Se permiten ciclos (dos autores pueden
/// citarse mutuamente) y lazos (un autor que se cita a sí mismo).
#[derive(Debug, Clone, Default)]
pub struct InfluenceGraph {
  graph: DiGraph<String, InfluenceEdge>,
  /// Índice nombre → nodo.
  node_indices: HashMap<String, NodeIndex>,
}

impl InfluenceGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reconstruye el grafo a partir de los campos `influence` del registro.
  pub fn from_registry(registry: &Registry) -> Self {
    let mut graph = Self::new();
    for (name, record) in registry.iter() {
      graph.ensure_node(name);
      for influence in record.influences() {
        graph.add_influence(name, influence);
      }
    }
    graph
  }

  pub fn ensure_node(&mut self, name: &str) -> NodeIndex {
    if let Some(&idx) = self.node_indices.get(name) {
      return idx;
    }
    let idx = self.graph.add_node(name.to_string());
    self.node_indices.insert(name.to_string(), idx);
    idx
  }

  /// Añade `author → influence` (idempotente).
  pub fn add_influence(&mut self, author: &str, influence: &str) {
    let from = self.ensure_node(author);
    let to = self.ensure_node(influence);
    self.graph.update_edge(from, to, InfluenceEdge);
  }

  /// Deja las aristas salientes de `author` exactamente en `influences`.
  pub fn set_influences(&mut self, author: &str, influences: &[String]) {
    let from = self.ensure_node(author);

    let stale: Vec<NodeIndex> = self
      .graph
      .edges_directed(from, Direction::Outgoing)
      .map(|edge| edge.target())
      .filter(|target| !influences.iter().any(|name| self.graph[*target] == *name))
      .collect();

    // Los NodeIndex son estables porque nunca se borran nodos.
    for target in stale {
      if let Some(edge) = self.graph.find_edge(from, target) {
        self.graph.remove_edge(edge);
      }
    }

    for influence in influences {
      self.add_influence(author, influence);
    }
  }

  pub fn contains(&self, name: &str) -> bool {
    self.node_indices.contains_key(name)
  }

  pub fn has_edge(&self, author: &str, influence: &str) -> bool {
    match (self.node_indices.get(author), self.node_indices.get(influence)) {
      (Some(&from), Some(&to)) => self.graph.contains_edge(from, to),
      _ => false,
    }
  }

  pub fn node_count(&self) -> usize {
    self.graph.node_count()
  }

  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  /// Nombres de todos los nodos, ordenados.
  pub fn nodes(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.graph.node_weights().map(String::as_str).collect();
    names.sort_unstable();
    names
  }

  /// Pares `(autor, influencia)` ordenados.
  pub fn edges(&self) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = self
      .graph
      .edge_references()
      .map(|edge| (self.graph[edge.source()].as_str(), self.graph[edge.target()].as_str()))
      .collect();
    pairs.sort_unstable();
    pairs
  }

  pub fn influences_of(&self, author: &str) -> Vec<&str> {
    self.neighbors(author, Direction::Outgoing)
  }

  /// Autores que declaran a `name` como influencia.
  pub fn influenced(&self, name: &str) -> Vec<&str> {
    self.neighbors(name, Direction::Incoming)
  }

  fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
    let Some(&idx) = self.node_indices.get(name) else {
      return Vec::new();
    };
    let mut names: Vec<&str> =
      self.graph.neighbors_directed(idx, direction).map(|n| self.graph[n].as_str()).collect();
    names.sort_unstable();
    names
  }

  /// Representación Graphviz del grafo, sin etiquetas en las aristas.
  pub fn to_dot(&self) -> String {
    format!("{}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn repeated_edges_are_collapsed() {
    let mut graph = InfluenceGraph::new();
    graph.add_influence("Isaac Asimov", "H.G. Wells");
    graph.add_influence("Isaac Asimov", "H.G. Wells");

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.has_edge("Isaac Asimov", "H.G. Wells"));
    assert!(!graph.has_edge("H.G. Wells", "Isaac Asimov"));
  }

  #[test]
  fn cycles_and_self_loops_are_allowed() {
    let mut graph = InfluenceGraph::new();
    graph.add_influence("A", "B");
    graph.add_influence("B", "A");
    graph.add_influence("C", "C");

    assert_eq!(graph.edges(), vec![("A", "B"), ("B", "A"), ("C", "C")]);
    assert_eq!(graph.influenced("A"), vec!["B"]);
  }

  #[test]
  fn set_influences_replaces_outgoing_edges_only() {
    let mut graph = InfluenceGraph::new();
    graph.set_influences("A", &["B".into(), "C".into()]);
    graph.add_influence("D", "C");

    graph.set_influences("A", &["C".into(), "E".into()]);

    assert_eq!(graph.influences_of("A"), vec!["C", "E"]);
    assert_eq!(graph.influenced("C"), vec!["A", "D"]);
    // B pierde la arista pero sigue siendo nodo.
    assert!(graph.contains("B"));
    assert_eq!(graph.edge_count(), 3);
  }

  #[test]
  fn rebuilds_from_registry() {
    let mut registry = Registry::new();
    registry.set_url("Borges", "u1");
    registry.set_influence("Borges", vec!["Chesterton".into(), "Kafka".into()]);
    registry.set_url("Orphan", "u2");

    let graph = InfluenceGraph::from_registry(&registry);

    assert_eq!(graph.nodes(), vec!["Borges", "Chesterton", "Kafka", "Orphan"]);
    assert_eq!(graph.edges(), vec![("Borges", "Chesterton"), ("Borges", "Kafka")]);
  }

  #[test]
  fn dot_output_names_every_author() {
    let mut graph = InfluenceGraph::new();
    graph.add_influence("Isaac Asimov", "H.G. Wells");

    let dot = graph.to_dot();
    assert!(dot.starts_with("digraph {"));
    assert!(dot.contains("Isaac Asimov"));
    assert!(dot.contains("H.G. Wells"));
    assert!(dot.contains("->"));
  }
}
