use serde::Deserialize;

/// Trade direction from the reporter's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum Direction {
	#[serde(rename = "M")]
	Import,
	#[serde(rename = "X")]
	Export,
}

/// A raw trade row as served by `/api/trade-data`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TradeRecord {
	#[serde(rename = "reporterISO")]
	pub reporter: String,
	#[serde(rename = "partnerISO")]
	pub partner: String,
	#[serde(rename = "reporterDesc")]
	pub direction: Direction,
	#[serde(rename = "refMonth")]
	pub ref_month: u32,
	#[serde(rename = "cmdCode")]
	pub commodity: String,
	#[serde(rename = "fobvalue")]
	pub value: f64,
}

impl TradeRecord {
	/// Country shipping the goods.
	pub fn exporter(&self) -> &str {
		match self.direction {
			Direction::Import => &self.partner,
			Direction::Export => &self.reporter,
		}
	}

	/// Country receiving the goods.
	pub fn importer(&self) -> &str {
		match self.direction {
			Direction::Import => &self.reporter,
			Direction::Export => &self.partner,
		}
	}
}

/// Whether a country only imports, only exports, or does both across a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
	Import,
	Export,
	Both,
}

impl Role {
	/// Legend order.
	pub const ALL: [Role; 3] = [Role::Import, Role::Export, Role::Both];

	pub fn as_str(self) -> &'static str {
		match self {
			Role::Import => "import",
			Role::Export => "export",
			Role::Both => "both",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct TradeNode {
	pub code: String,
	/// Sum of every record value touching this country, regardless of direction.
	pub value: f64,
	pub role: Role,
}

/// Directed exporter -> importer edge.
#[derive(Clone, Debug, PartialEq)]
pub struct TradeEdge {
	pub source: String,
	pub target: String,
	pub value: f64,
}

impl TradeEdge {
	pub fn is_self_loop(&self) -> bool {
		self.source == self.target
	}
}

/// Nodes sorted by country code, edges sorted by `(source, target)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TradeGraph {
	pub nodes: Vec<TradeNode>,
	pub edges: Vec<TradeEdge>,
}

impl TradeGraph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node_index(&self, code: &str) -> Option<usize> {
		self.nodes
			.binary_search_by(|n| n.code.as_str().cmp(code))
			.ok()
	}

	pub fn node(&self, code: &str) -> Option<&TradeNode> {
		self.node_index(code).map(|i| &self.nodes[i])
	}

	pub fn edge(&self, source: &str, target: &str) -> Option<&TradeEdge> {
		self.edges
			.iter()
			.find(|e| e.source == source && e.target == target)
	}

	pub fn max_node_value(&self) -> f64 {
		self.nodes.iter().map(|n| n.value).fold(0.0, f64::max)
	}

	pub fn max_edge_value(&self) -> f64 {
		self.edges.iter().map(|e| e.value).fold(0.0, f64::max)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_wire_field_names() {
		let json = r#"{
			"reporterISO": "IDN",
			"partnerISO": "IND",
			"reporterDesc": "X",
			"refMonth": 3,
			"cmdCode": "Palm oil and its fractions",
			"fobvalue": 1250.5
		}"#;
		let record: TradeRecord = serde_json::from_str(json).unwrap();
		assert_eq!(record.reporter, "IDN");
		assert_eq!(record.partner, "IND");
		assert_eq!(record.direction, Direction::Export);
		assert_eq!(record.ref_month, 3);
		assert_eq!(record.value, 1250.5);
	}

	#[test]
	fn direction_flag_normalizes_orientation() {
		let mut record = TradeRecord {
			reporter: "IND".into(),
			partner: "MYS".into(),
			direction: Direction::Import,
			ref_month: 1,
			commodity: "palm oil".into(),
			value: 1.0,
		};
		assert_eq!((record.exporter(), record.importer()), ("MYS", "IND"));

		record.direction = Direction::Export;
		assert_eq!((record.exporter(), record.importer()), ("IND", "MYS"));
	}

	#[test]
	fn rejects_unknown_direction_flag() {
		let json = r#"{"reporterISO":"A","partnerISO":"B","reporterDesc":"R",
			"refMonth":1,"cmdCode":"palm oil","fobvalue":1}"#;
		assert!(serde_json::from_str::<TradeRecord>(json).is_err());
	}

	#[test]
	fn role_labels_in_legend_order() {
		let labels: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
		assert_eq!(labels, ["import", "export", "both"]);
	}
}
