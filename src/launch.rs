//! Typed description of the simulation launch.
//!
//! Nothing here starts processes. The description is rendered either as
//! `ros2 run` style command lines or as JSON for the launch framework.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::{PACKAGE_NAME, ROBOT_NAME};

pub const GUI_ARGUMENT: &str = "gui";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BridgeDirection {
    /// Gazebo publishes, ROS subscribes.
    GzToRos,
    /// ROS publishes, Gazebo subscribes.
    RosToGz,
    Bidirectional,
}

impl BridgeDirection {
    fn symbol(self) -> char {
        match self {
            BridgeDirection::GzToRos => '[',
            BridgeDirection::RosToGz => ']',
            BridgeDirection::Bidirectional => '@',
        }
    }
}

/// One `parameter_bridge` argument: `<topic>@<ros type><dir><gz type>`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BridgeTopic {
    pub topic: String,
    pub ros_type: String,
    pub direction: BridgeDirection,
    pub gz_type: String,
}

impl BridgeTopic {
    pub fn new(topic: &str, ros_type: &str, direction: BridgeDirection, gz_type: &str) -> Self {
        BridgeTopic {
            topic: topic.to_owned(),
            ros_type: ros_type.to_owned(),
            direction,
            gz_type: gz_type.to_owned(),
        }
    }
}

impl fmt::Display for BridgeTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}{}{}",
            self.topic,
            self.ros_type,
            self.direction.symbol(),
            self.gz_type
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed bridge topic `{0}`")]
pub struct BridgeTopicParseError(String);

impl FromStr for BridgeTopic {
    type Err = BridgeTopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || BridgeTopicParseError(s.to_owned());
        let (topic, rest) = s.split_once('@').ok_or_else(err)?;
        let (idx, sym) = rest
            .char_indices()
            .find(|(_, c)| matches!(c, '[' | ']' | '@'))
            .ok_or_else(err)?;
        let direction = match sym {
            '[' => BridgeDirection::GzToRos,
            ']' => BridgeDirection::RosToGz,
            _ => BridgeDirection::Bidirectional,
        };
        let ros_type = &rest[..idx];
        let gz_type = &rest[idx + 1..];
        if topic.is_empty() || ros_type.is_empty() || gz_type.is_empty() {
            return Err(err());
        }
        Ok(BridgeTopic::new(topic, ros_type, direction, gz_type))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Text(String),
    /// Stdout of a command, evaluated by the launch framework at start-up.
    CommandOutput(Vec<String>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(text) => f.write_str(text),
            ParamValue::CommandOutput(cmd) => write!(f, "$(command {})", cmd.join(" ")),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Start only when the named launch argument is true.
    IfArgument(String),
}

impl Condition {
    fn holds(&self, args: &HashMap<String, String>) -> bool {
        match self {
            Condition::IfArgument(name) => args
                .get(name)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1"))
                .unwrap_or(false),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub package: String,
    pub executable: String,
    pub name: Option<String>,
    pub arguments: Vec<String>,
    pub parameters: Vec<(String, ParamValue)>,
    pub remappings: Vec<(String, String)>,
    pub condition: Option<Condition>,
}

impl NodeSpec {
    pub fn new(package: &str, executable: &str) -> Self {
        NodeSpec {
            package: package.to_owned(),
            executable: executable.to_owned(),
            name: None,
            arguments: Vec::new(),
            parameters: Vec::new(),
            remappings: Vec::new(),
            condition: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn param(mut self, key: &str, value: ParamValue) -> Self {
        self.parameters.push((key.to_owned(), value));
        self
    }

    pub fn remap(mut self, from: &str, to: &str) -> Self {
        self.remappings.push((from.to_owned(), to.to_owned()));
        self
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// `ros2 run` invocation equivalent to this node.
    pub fn command_line(&self) -> Vec<String> {
        let mut cmd = vec![
            "ros2".to_owned(),
            "run".to_owned(),
            self.package.clone(),
            self.executable.clone(),
        ];
        cmd.extend(self.arguments.iter().cloned());

        let has_ros_args =
            self.name.is_some() || !self.parameters.is_empty() || !self.remappings.is_empty();
        if has_ros_args {
            cmd.push("--ros-args".to_owned());
        }
        if let Some(name) = &self.name {
            cmd.push("-r".to_owned());
            cmd.push(format!("__node:={name}"));
        }
        for (from, to) in &self.remappings {
            cmd.push("-r".to_owned());
            cmd.push(format!("{from}:={to}"));
        }
        for (key, value) in &self.parameters {
            cmd.push("-p".to_owned());
            cmd.push(format!("{key}:={value}"));
        }
        cmd
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LaunchEntry {
    Process { cmd: Vec<String> },
    Node(NodeSpec),
}

impl LaunchEntry {
    pub fn command_line(&self) -> Vec<String> {
        match self {
            LaunchEntry::Process { cmd } => cmd.clone(),
            LaunchEntry::Node(node) => node.command_line(),
        }
    }

    fn enabled(&self, args: &HashMap<String, String>) -> bool {
        match self {
            LaunchEntry::Process { .. } => true,
            LaunchEntry::Node(node) => node.condition.as_ref().map_or(true, |c| c.holds(args)),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LaunchArgument {
    pub name: String,
    pub default_value: String,
    pub description: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LaunchDescription {
    pub arguments: Vec<LaunchArgument>,
    pub entries: Vec<LaunchEntry>,
}

impl LaunchDescription {
    /// Appends a topic to every `parameter_bridge` node. Returns false when
    /// the description has no bridge.
    pub fn add_bridge_topic(&mut self, topic: &BridgeTopic) -> bool {
        let mut added = false;
        for entry in &mut self.entries {
            if let LaunchEntry::Node(node) = entry {
                if node.package == "ros_gz_bridge" && node.executable == "parameter_bridge" {
                    node.arguments.push(topic.to_string());
                    added = true;
                }
            }
        }
        added
    }

    /// Entries that start for the given argument values; unset arguments
    /// take their declared default.
    pub fn resolve(&self, overrides: &HashMap<String, String>) -> Vec<&LaunchEntry> {
        let mut values: HashMap<String, String> = self
            .arguments
            .iter()
            .map(|a| (a.name.clone(), a.default_value.clone()))
            .collect();
        values.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

        self.entries.iter().filter(|e| e.enabled(&values)).collect()
    }
}

/// Paths inside the package's share directory.
#[derive(Debug, Clone)]
pub struct SharePaths {
    root: PathBuf,
}

impl SharePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SharePaths { root: root.into() }
    }

    pub fn urdf(&self) -> PathBuf {
        self.root.join("urdf").join("my_robot_gz.urdf.xacro")
    }

    pub fn world(&self) -> PathBuf {
        self.root.join("worlds").join("empty.sdf")
    }

    pub fn rviz_config(&self) -> PathBuf {
        self.root.join("config").join("robot.rviz")
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

pub fn default_bridge_topics() -> Vec<BridgeTopic> {
    let model = format!("/model/{ROBOT_NAME}");
    vec![
        BridgeTopic::new(
            "/clock",
            "rosgraph_msgs/msg/Clock",
            BridgeDirection::GzToRos,
            "gz.msgs.Clock",
        ),
        BridgeTopic::new(
            &format!("{model}/cmd_vel"),
            "geometry_msgs/msg/Twist",
            BridgeDirection::RosToGz,
            "gz.msgs.Twist",
        ),
        BridgeTopic::new(
            &format!("{model}/odometry"),
            "nav_msgs/msg/Odometry",
            BridgeDirection::GzToRos,
            "gz.msgs.Odometry",
        ),
    ]
}

/// Simulator, robot spawn, bridge, camera positioning and RViz.
pub fn robot_launch(share: &SharePaths) -> LaunchDescription {
    let model = format!("/model/{ROBOT_NAME}");

    let gazebo = LaunchEntry::Process {
        cmd: vec![
            "gz".to_owned(),
            "sim".to_owned(),
            "-r".to_owned(),
            path_arg(&share.world()),
        ],
    };

    let robot_state_publisher = NodeSpec::new("robot_state_publisher", "robot_state_publisher")
        .param(
            "robot_description",
            ParamValue::CommandOutput(vec!["xacro".to_owned(), path_arg(&share.urdf())]),
        );

    let spawn_entity = NodeSpec::new("ros_gz_sim", "create").args([
        "-topic",
        "robot_description",
        "-name",
        ROBOT_NAME,
        "-x",
        "0",
        "-y",
        "0",
        "-z",
        "0.1",
    ]);

    let set_camera = NodeSpec::new(PACKAGE_NAME, "set_camera");

    let joint_state_publisher_gui =
        NodeSpec::new("joint_state_publisher_gui", "joint_state_publisher_gui")
            .name("joint_state_publisher_gui")
            .when(Condition::IfArgument(GUI_ARGUMENT.to_owned()));

    let bridge = NodeSpec::new("ros_gz_bridge", "parameter_bridge")
        .args(default_bridge_topics().iter().map(ToString::to_string))
        .remap(&format!("{model}/cmd_vel"), "/cmd_vel")
        .remap(&format!("{model}/odometry"), "/odom");

    let rviz_config = share.rviz_config();
    let mut rviz = NodeSpec::new("rviz2", "rviz2").name("rviz2");
    if rviz_config.exists() {
        rviz = rviz.args(["-d".to_owned(), path_arg(&rviz_config)]);
    }

    LaunchDescription {
        arguments: vec![LaunchArgument {
            name: GUI_ARGUMENT.to_owned(),
            default_value: "false".to_owned(),
            description: "Start joint state publisher GUI".to_owned(),
        }],
        entries: vec![
            gazebo,
            LaunchEntry::Node(robot_state_publisher),
            LaunchEntry::Node(spawn_entity),
            LaunchEntry::Node(set_camera),
            LaunchEntry::Node(joint_state_publisher_gui),
            LaunchEntry::Node(bridge),
            LaunchEntry::Node(rviz),
        ],
    }
}

/// Joins a command line, single-quoting words the shell would split.
pub fn shell_join(cmd: &[String]) -> String {
    cmd.iter()
        .map(|word| {
            let plain = !word.is_empty()
                && word
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+".contains(c));
            if plain {
                word.clone()
            } else {
                format!("'{}'", word.replace('\'', r"'\''"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
