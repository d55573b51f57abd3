pub mod params_codec;
