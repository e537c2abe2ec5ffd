//! Turns flat trade rows into the country graph.

use std::collections::{BTreeMap, HashSet};

use super::types::{Role, TradeEdge, TradeGraph, TradeNode, TradeRecord};

/// Sum in ascending order so the total doesn't depend on row order.
fn ordered_sum(mut values: Vec<f64>) -> f64 {
	values.sort_by(f64::total_cmp);
	values.into_iter().sum()
}

/// Build nodes (one per country) and exporter -> importer edges.
///
/// Roles come from a full pre-pass over `records`, so they don't depend on row
/// order. Values are summed as-is, smallest first, including zero or negative
/// rows and rows where reporter and partner are the same country.
pub fn derive_graph(records: &[TradeRecord]) -> TradeGraph {
	let mut importers = HashSet::new();
	let mut exporters = HashSet::new();
	for r in records {
		importers.insert(r.importer());
		exporters.insert(r.exporter());
	}

	let mut node_values: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
	for r in records {
		node_values.entry(r.reporter.as_str()).or_default().push(r.value);
		node_values.entry(r.partner.as_str()).or_default().push(r.value);
	}

	let nodes = node_values
		.into_iter()
		.map(|(code, values)| {
			let role = match (importers.contains(code), exporters.contains(code)) {
				(true, true) => Role::Both,
				(true, false) => Role::Import,
				_ => Role::Export,
			};
			TradeNode {
				code: code.to_owned(),
				value: ordered_sum(values),
				role,
			}
		})
		.collect();

	let mut edge_values: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
	for r in records {
		edge_values
			.entry((r.exporter(), r.importer()))
			.or_default()
			.push(r.value);
	}

	let edges = edge_values
		.into_iter()
		.map(|((source, target), values)| TradeEdge {
			source: source.to_owned(),
			target: target.to_owned(),
			value: ordered_sum(values),
		})
		.collect();

	TradeGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::trade_network::types::Direction;

	fn rec(reporter: &str, partner: &str, direction: Direction, value: f64) -> TradeRecord {
		TradeRecord {
			reporter: reporter.into(),
			partner: partner.into(),
			direction,
			ref_month: 1,
			commodity: "Palm oil".into(),
			value,
		}
	}

	fn sample() -> Vec<TradeRecord> {
		use Direction::*;
		vec![
			rec("IDN", "IND", Export, 120.0),
			rec("IND", "IDN", Import, 80.0),
			rec("MYS", "CHN", Export, 60.0),
			rec("CHN", "IDN", Import, 40.0),
			rec("NLD", "MYS", Import, 25.0),
			rec("NLD", "DEU", Export, 10.0),
			rec("IND", "MYS", Import, 7.0),
		]
	}

	#[test]
	fn reporter_and_partner_collapse_into_one_edge() {
		let records = vec![
			rec("A", "B", Direction::Export, 10.0),
			rec("B", "A", Direction::Import, 5.0),
		];
		let graph = derive_graph(&records);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(
			graph.edges[0],
			TradeEdge {
				source: "A".into(),
				target: "B".into(),
				value: 15.0,
			}
		);
		assert_eq!(graph.node("A").unwrap().role, Role::Export);
		assert_eq!(graph.node("B").unwrap().role, Role::Import);
		assert_eq!(graph.node("A").unwrap().value, 15.0);
	}

	#[test]
	fn one_node_per_distinct_country() {
		let records = sample();
		let graph = derive_graph(&records);
		let distinct: HashSet<&str> = records
			.iter()
			.flat_map(|r| [r.reporter.as_str(), r.partner.as_str()])
			.collect();
		assert_eq!(graph.nodes.len(), distinct.len());
		for code in distinct {
			assert!(graph.node(code).is_some(), "missing {code}");
		}
	}

	#[test]
	fn roles_follow_import_and_export_sides() {
		let graph = derive_graph(&sample());
		let role = |c: &str| graph.node(c).unwrap().role;
		// NLD imports from MYS and exports to DEU
		assert_eq!(role("NLD"), Role::Both);
		// MYS exports to CHN, NLD, IND
		assert_eq!(role("MYS"), Role::Export);
		// IDN exports to IND and CHN
		assert_eq!(role("IDN"), Role::Export);
		assert_eq!(role("IND"), Role::Import);
		assert_eq!(role("CHN"), Role::Import);
		assert_eq!(role("DEU"), Role::Import);
	}

	#[test]
	fn role_is_both_iff_seen_on_both_sides() {
		let records = sample();
		let graph = derive_graph(&records);
		for node in &graph.nodes {
			let imports = records.iter().any(|r| r.importer() == node.code);
			let exports = records.iter().any(|r| r.exporter() == node.code);
			assert_eq!(node.role == Role::Both, imports && exports, "{}", node.code);
		}
	}

	#[test]
	fn node_values_are_direction_agnostic() {
		let graph = derive_graph(&sample());
		// 120 + 80 + 40
		assert_eq!(graph.node("IDN").unwrap().value, 240.0);
		// 60 + 25 + 7
		assert_eq!(graph.node("MYS").unwrap().value, 92.0);
	}

	#[test]
	fn edge_values_are_conserved() {
		let records = sample();
		let graph = derive_graph(&records);
		let edge_total: f64 = graph.edges.iter().map(|e| e.value).sum();
		let record_total: f64 = records.iter().map(|r| r.value).sum();
		assert_eq!(edge_total, record_total);
		assert_eq!(graph.edge("IDN", "IND").unwrap().value, 200.0);
		assert_eq!(graph.edge("MYS", "NLD").unwrap().value, 25.0);
	}

	#[test]
	fn permutation_does_not_change_output() {
		let records = sample();
		let expected = derive_graph(&records);

		let mut reversed = records.clone();
		reversed.reverse();
		assert_eq!(derive_graph(&reversed), expected);

		let mut rotated = records;
		rotated.rotate_left(3);
		assert_eq!(derive_graph(&rotated), expected);
	}

	#[test]
	fn fractional_values_sum_the_same_in_any_order() {
		let forward = vec![
			rec("IDN", "IND", Direction::Export, 0.1),
			rec("IDN", "IND", Direction::Export, 0.2),
			rec("IND", "IDN", Direction::Import, 0.3),
		];
		let expected = derive_graph(&forward);
		let mut reversed = forward.clone();
		reversed.reverse();
		assert_eq!(derive_graph(&reversed), expected);

		let mut rotated = forward;
		rotated.rotate_left(1);
		assert_eq!(derive_graph(&rotated), expected);
		assert_eq!(expected.edges.len(), 1);
	}

	#[test]
	fn empty_input_gives_empty_graph() {
		let graph = derive_graph(&[]);
		assert!(graph.is_empty());
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn keeps_self_loops_and_non_positive_values() {
		let records = vec![
			rec("IDN", "IDN", Direction::Export, 3.0),
			rec("IDN", "IND", Direction::Export, 0.0),
			rec("IDN", "IND", Direction::Export, -2.0),
		];
		let graph = derive_graph(&records);
		assert_eq!(graph.edge("IDN", "IDN").unwrap().value, 3.0);
		assert!(graph.edge("IDN", "IDN").unwrap().is_self_loop());
		assert_eq!(graph.edge("IDN", "IND").unwrap().value, -2.0);
		// the self-loop row counts for IDN on both the reporter and partner side
		assert_eq!(graph.node("IDN").unwrap().value, 4.0);
		assert_eq!(graph.node("IDN").unwrap().role, Role::Both);
	}
}
