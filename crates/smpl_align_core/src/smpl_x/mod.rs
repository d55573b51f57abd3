pub mod smpl_x_rig;
