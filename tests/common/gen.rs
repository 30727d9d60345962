use std::iter;

use ndarray::ArrayD;
use rand::distributions::{Alphanumeric, Uniform};
use rand::prelude::{Distribution, Rng};

pub fn gen_shape<R: Rng + ?Sized>(rng: &mut R, ndim: usize) -> Vec<usize> {
    iter::repeat(()).map(|_| rng.gen_range(1..6)).take(ndim).collect()
}

pub fn gen_ascii<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    iter::repeat(()).map(|_| rng.sample(Alphanumeric)).map(char::from).take(len).collect()
}

/// A non-empty link name without separators.
pub fn gen_link_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(1..8);
    gen_ascii(rng, len)
}

/// A path string with random separators: leading, trailing, doubled, and `.` segments.
pub fn gen_path_string<R: Rng + ?Sized>(rng: &mut R) -> (String, Vec<String>) {
    let nsegments = rng.gen_range(0..6);
    let names: Vec<String> = (0..nsegments).map(|_| gen_link_name(rng)).collect();
    let mut s = String::new();
    if rng.gen_bool(0.5) {
        s.push('/');
    }
    for name in &names {
        if rng.gen_bool(0.2) {
            s.push_str("./");
        }
        s.push_str(name);
        s.push('/');
        if rng.gen_bool(0.2) {
            s.push('/');
        }
    }
    if rng.gen_bool(0.5) {
        s.pop();
    }
    (s, names)
}

pub fn gen_arr<T, R>(rng: &mut R, ndim: usize) -> ArrayD<T>
where
    R: Rng + ?Sized,
    Uniform<T>: Distribution<T>,
    T: rand::distributions::uniform::SampleUniform + From<u8>,
{
    let shape = gen_shape(rng, ndim);
    let dist = Uniform::new(T::from(0), T::from(100));
    let size = shape.iter().product();
    let elements = (0..size).map(|_| dist.sample(rng)).collect();
    ArrayD::from_shape_vec(shape, elements).unwrap()
}
