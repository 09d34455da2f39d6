use glam::Mat3;

use crate::core::Camera;

pub fn format_mat3(name: &str, mat: &Mat3) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}:\n", name));

    output.push_str(&format!(
        "x_axis: [{:8.3},{:8.3},{:8.3}]\n",
        mat.x_axis.x, mat.x_axis.y, mat.x_axis.z
    ));

    output.push_str(&format!(
        "y_axis: [{:8.3},{:8.3},{:8.3}]\n",
        mat.y_axis.x, mat.y_axis.y, mat.y_axis.z
    ));

    output.push_str(&format!(
        "z_axis: [{:8.3},{:8.3},{:8.3}]\n",
        mat.z_axis.x, mat.z_axis.y, mat.z_axis.z
    ));

    output
}

/// Multi-line dump of the camera, logged on demand from the window loop.
pub fn format_camera(camera: &Camera) -> String {
    let p = camera.position;
    let mut output = format!(
        "camera at [{:.3}, {:.3}, {:.3}] yaw {:.2} pitch {:.2} roll {:.2}\n",
        p.x, p.y, p.z, camera.yaw, camera.pitch, camera.roll
    );
    output.push_str(&format_mat3("view rotation", &camera.view_rotation()));
    output
}
