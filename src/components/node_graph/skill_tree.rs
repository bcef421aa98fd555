//! The literal skill tree: one core node and six specialities hanging off it.

use super::types::{Appearance, Point2};

/// Base radius of a relative-size-1 skill node, in pixels.
pub const SKILL_NODE_RADIUS: f64 = 30.0;
/// The core node is drawn larger than its children.
pub const CORE_NODE_RADIUS: f64 = 40.0;

/// A row of the static skill table.
#[derive(Clone, Copy, Debug)]
pub struct SkillEntry {
	pub name: &'static str,
	pub description: &'static str,
	/// Glyph drawn inside the node.
	pub icon: &'static str,
	pub color: &'static str,
	/// Layout slot as a fraction of the surface size.
	pub x: f64,
	pub y: f64,
	/// Relative size multiplier.
	pub size: f64,
	pub skills: &'static [&'static str],
}

pub const CORE_SKILL: SkillEntry = SkillEntry {
	name: "AI/ML Core",
	description: "Foundation of artificial intelligence and machine learning",
	icon: "🧠",
	color: "#7B4DFF",
	x: 0.5,
	y: 0.35,
	size: 1.5,
	skills: &["Mathematics", "Statistics", "Algorithms", "Data Structures"],
};

pub const CHILD_SKILLS: &[SkillEntry] = &[
	SkillEntry {
		name: "Machine Learning",
		description: "Algorithms and statistical models",
		icon: "⚙",
		color: "#39FF14",
		x: 0.25,
		y: 0.6,
		size: 1.2,
		skills: &[
			"Supervised Learning",
			"Unsupervised Learning",
			"Ensemble Methods",
			"Feature Engineering",
		],
	},
	SkillEntry {
		name: "Deep Learning",
		description: "Neural network architectures and techniques",
		icon: "🕸",
		color: "#FF00FF",
		x: 0.75,
		y: 0.6,
		size: 1.2,
		skills: &["Neural Networks", "CNN", "RNN", "Transformers", "GAN"],
	},
	SkillEntry {
		name: "Data Science",
		description: "Extracting insights from data",
		icon: "📊",
		color: "#00F5FF",
		x: 0.1,
		y: 0.8,
		size: 1.0,
		skills: &[
			"Data Analysis",
			"Visualization",
			"Exploratory Data Analysis",
			"Feature Selection",
		],
	},
	SkillEntry {
		name: "Computer Vision",
		description: "Image and video analysis",
		icon: "👁",
		color: "#39FF14",
		x: 0.4,
		y: 0.8,
		size: 1.0,
		skills: &[
			"Image Classification",
			"Object Detection",
			"Segmentation",
			"Facial Recognition",
		],
	},
	SkillEntry {
		name: "NLP",
		description: "Processing and understanding language",
		icon: "🗣",
		color: "#FF00FF",
		x: 0.6,
		y: 0.8,
		size: 1.0,
		skills: &[
			"Text Classification",
			"Named Entity Recognition",
			"Sentiment Analysis",
			"Machine Translation",
		],
	},
	SkillEntry {
		name: "Reinforcement Learning",
		description: "Learning through interaction with environment",
		icon: "🎮",
		color: "#00F5FF",
		x: 0.9,
		y: 0.8,
		size: 1.0,
		skills: &["Q-Learning", "Policy Gradients", "Deep RL", "Multi-agent Systems"],
	},
];

/// Owned node payload, also what the detail panel shows.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillDetails {
	pub name: String,
	pub description: String,
	pub icon: String,
	pub color: String,
	pub skills: Vec<String>,
}

impl From<&SkillEntry> for SkillDetails {
	fn from(e: &SkillEntry) -> Self {
		Self {
			name: e.name.into(),
			description: e.description.into(),
			icon: e.icon.into(),
			color: e.color.into(),
			skills: e.skills.iter().map(|s| s.to_string()).collect(),
		}
	}
}

impl Appearance for SkillDetails {
	fn color(&self) -> &str {
		&self.color
	}

	fn label(&self) -> Option<&str> {
		Some(&self.name)
	}

	fn icon(&self) -> Option<&str> {
		Some(&self.icon)
	}
}

impl SkillEntry {
	pub fn fraction(&self) -> Point2 {
		Point2::new(self.x, self.y)
	}

	pub fn radius(&self, base: f64) -> f64 {
		base * self.size
	}
}
