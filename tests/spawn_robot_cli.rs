use std::process::Command;

fn spawn_robot(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_spawn_robot"))
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn prints_one_line_per_process() {
    let dir = tempfile::tempdir().unwrap();
    let share = dir.path().to_str().unwrap();

    let stdout = spawn_robot(&["--share-dir", share]);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("gz sim -r "));
    assert!(lines.iter().any(|l| *l == "ros2 run my_robot_sim set_camera"));
    assert!(!stdout.contains("joint_state_publisher_gui"));
}

#[test]
fn gui_flag_adds_joint_state_publisher_gui() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = spawn_robot(&["--share-dir", dir.path().to_str().unwrap(), "--gui"]);
    assert_eq!(stdout.lines().count(), 7);
    assert!(stdout.contains(
        "ros2 run joint_state_publisher_gui joint_state_publisher_gui --ros-args -r __node:=joint_state_publisher_gui"
    ));
}

#[test]
fn json_output_lists_arguments_and_entries() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = spawn_robot(&["--share-dir", dir.path().to_str().unwrap(), "--json"]);
    let doc: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(doc["arguments"][0]["name"], "gui");
    assert_eq!(doc["arguments"][0]["default_value"], "false");

    let entries = doc["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[0]["type"], "process");

    let bridge = entries
        .iter()
        .find(|e| e["executable"] == "parameter_bridge")
        .unwrap();
    assert_eq!(
        bridge["arguments"][1],
        "/model/my_robot/cmd_vel@geometry_msgs/msg/Twist]gz.msgs.Twist"
    );
}

#[test]
fn bridge_flag_adds_topics_to_the_bridge() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = spawn_robot(&[
        "--share-dir",
        dir.path().to_str().unwrap(),
        "--bridge",
        "/scan@sensor_msgs/msg/LaserScan[gz.msgs.LaserScan",
    ]);
    let bridge = stdout
        .lines()
        .find(|l| l.starts_with("ros2 run ros_gz_bridge parameter_bridge"))
        .unwrap();
    let odom = bridge
        .find("/model/my_robot/odometry@nav_msgs/msg/Odometry[gz.msgs.Odometry")
        .unwrap();
    let scan = bridge
        .find("/scan@sensor_msgs/msg/LaserScan[gz.msgs.LaserScan")
        .unwrap();
    assert!(odom < scan, "{bridge}");
    assert!(scan < bridge.find("--ros-args").unwrap(), "{bridge}");
}

#[test]
fn malformed_bridge_flag_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_spawn_robot"))
        .args(["--bridge", "/scan"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed bridge topic"));
}
