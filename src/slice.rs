// SPDX-License-Identifier: MPL-2.0

//! Fourier transforms of 2D row major buffers.
//!
//! Two families live here. [`dft_2d`] and [`idft_2d`] evaluate every
//! coefficient straight from the definition of the discrete Fourier
//! transform, in O(width² * height²). [`fft_2d`] and [`ifft_2d`] are the
//! separable equivalents built on rustfft: transform the rows, then the
//! columns. Each comes with a `par_` variant computing rows in parallel.
//!
//! None of these functions normalize their output.
//! If a buffer goes through a forward then an inverse transform,
//! multiply it by 1 / (width * height) at the end.

use std::f64::consts::PI;

use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};
use rustfft::{num_complex::Complex, FftDirection, FftPlanner};

/// Compute the 2D discrete Fourier transform of an image buffer by direct summation.
///
/// The coefficient at `(k, l)` is the sum over every pixel `(i, j)` of
/// `pixel * exp(-2πi * (k * i / height + l * j / width))`.
/// The returned buffer is in row major order, like the input.
pub fn dft_2d(width: usize, height: usize, img_buffer: &[Complex<f64>]) -> Vec<Complex<f64>> {
    dft_2d_with_direction(width, height, img_buffer, FftDirection::Forward, false)
}

/// Compute the inverse 2D discrete Fourier transform by direct summation.
///
/// Same as [`dft_2d`] with the sign of the exponent flipped.
pub fn idft_2d(width: usize, height: usize, freq_buffer: &[Complex<f64>]) -> Vec<Complex<f64>> {
    dft_2d_with_direction(width, height, freq_buffer, FftDirection::Inverse, false)
}

/// Parallel version of [`dft_2d`].
///
/// Output rows are spread over the current rayon pool.
/// The result is identical to the sequential one.
pub fn par_dft_2d(width: usize, height: usize, img_buffer: &[Complex<f64>]) -> Vec<Complex<f64>> {
    dft_2d_with_direction(width, height, img_buffer, FftDirection::Forward, true)
}

/// Parallel version of [`idft_2d`].
pub fn par_idft_2d(width: usize, height: usize, freq_buffer: &[Complex<f64>]) -> Vec<Complex<f64>> {
    dft_2d_with_direction(width, height, freq_buffer, FftDirection::Inverse, true)
}

fn dft_2d_with_direction(
    width: usize,
    height: usize,
    buffer: &[Complex<f64>],
    direction: FftDirection,
    parallel: bool,
) -> Vec<Complex<f64>> {
    assert_eq!(buffer.len(), width * height, "buffer does not match {width}x{height}");
    let row_twiddles = twiddles(height, direction);
    let col_twiddles = twiddles(width, direction);
    let mut out = vec![Complex::default(); buffer.len()];
    let compute_row = |(k, out_row): (usize, &mut [Complex<f64>])| {
        dft_row(k, width, height, buffer, &row_twiddles, &col_twiddles, out_row)
    };
    if parallel {
        out.par_chunks_exact_mut(width).enumerate().for_each(compute_row);
    } else {
        out.chunks_exact_mut(width).enumerate().for_each(compute_row);
    }
    out
}

/// Fill the output row `k` of a direct transform.
///
/// The phase `exp(±2πi * k * i / height)` is shared by a whole input row,
/// so each input row is first summed against the column phases.
fn dft_row(
    k: usize,
    width: usize,
    height: usize,
    buffer: &[Complex<f64>],
    row_twiddles: &[Complex<f64>],
    col_twiddles: &[Complex<f64>],
    out_row: &mut [Complex<f64>],
) {
    for (l, coef) in out_row.iter_mut().enumerate() {
        let mut sum = Complex::default();
        for (i, in_row) in buffer.chunks_exact(width).enumerate() {
            let row_sum: Complex<f64> = in_row
                .iter()
                .enumerate()
                .map(|(j, &value)| value * col_twiddles[(l * j) % width])
                .sum();
            sum += row_sum * row_twiddles[(k * i) % height];
        }
        *coef = sum;
    }
}

/// The `n` roots of unity `exp(∓2πi * m / n)`, sign given by the direction.
///
/// Multiples of a quarter turn are stored exactly (0, ±1, ±i) instead of
/// going through cos and sin, which would leave residues around 1e-16.
fn twiddles(n: usize, direction: FftDirection) -> Vec<Complex<f64>> {
    let sign = match direction {
        FftDirection::Forward => -1.0,
        FftDirection::Inverse => 1.0,
    };
    (0..n)
        .map(|m| {
            if (4 * m) % n == 0 {
                match 4 * m / n {
                    0 => Complex::new(1.0, 0.0),
                    1 => Complex::new(0.0, sign),
                    2 => Complex::new(-1.0, 0.0),
                    _ => Complex::new(0.0, -sign),
                }
            } else {
                let angle = sign * 2.0 * PI * m as f64 / n as f64;
                Complex::new(angle.cos(), angle.sin())
            }
        })
        .collect()
}

/// Compute the 2D Fourier transform of an image buffer, in place.
///
/// The image buffer is considered to be stored in row major order,
/// and stays in row major order after the transform.
///
/// Remark: two allocations the size of the image buffer are performed for
/// the transpositions, as well as scratch buffers while performing the
/// rows and columns FFTs.
pub fn fft_2d(width: usize, height: usize, img_buffer: &mut [Complex<f64>]) {
    fft_2d_with_direction(width, height, img_buffer, FftDirection::Forward)
}

/// Compute the inverse 2D Fourier transform of a buffer, in place.
pub fn ifft_2d(width: usize, height: usize, img_buffer: &mut [Complex<f64>]) {
    fft_2d_with_direction(width, height, img_buffer, FftDirection::Inverse)
}

fn fft_2d_with_direction(
    width: usize,
    height: usize,
    img_buffer: &mut [Complex<f64>],
    direction: FftDirection,
) {
    // Compute the FFT of each row of the image.
    let mut planner = FftPlanner::new();
    let fft_width = planner.plan_fft(width, direction);
    let mut scratch = vec![Complex::default(); fft_width.get_inplace_scratch_len()];
    for row_buffer in img_buffer.chunks_exact_mut(width) {
        fft_width.process_with_scratch(row_buffer, &mut scratch);
    }

    // Transpose the image to be able to compute the FFT on the other dimension.
    let mut transposed = transpose(width, height, img_buffer);
    let fft_height = planner.plan_fft(height, direction);
    scratch.resize(fft_height.get_inplace_scratch_len(), Complex::default());
    for col_buffer in transposed.chunks_exact_mut(height) {
        fft_height.process_with_scratch(col_buffer, &mut scratch);
    }

    img_buffer.copy_from_slice(&transpose(height, width, &transposed));
}

/// Parallel version of [`fft_2d`].
///
/// This uses rayon internally, rows and then columns are spread over the
/// current rayon pool.
pub fn par_fft_2d(width: usize, height: usize, img_buffer: &mut [Complex<f64>]) {
    par_fft_2d_with_direction(width, height, img_buffer, FftDirection::Forward)
}

/// Parallel version of [`ifft_2d`].
pub fn par_ifft_2d(width: usize, height: usize, img_buffer: &mut [Complex<f64>]) {
    par_fft_2d_with_direction(width, height, img_buffer, FftDirection::Inverse)
}

fn par_fft_2d_with_direction(
    width: usize,
    height: usize,
    img_buffer: &mut [Complex<f64>],
    direction: FftDirection,
) {
    let mut planner = FftPlanner::new();
    let fft_width = planner.plan_fft(width, direction);
    img_buffer
        .par_chunks_exact_mut(width)
        .for_each(|row_buffer| fft_width.process(row_buffer));

    let mut transposed = transpose(width, height, img_buffer);
    let fft_height = planner.plan_fft(height, direction);
    transposed
        .par_chunks_exact_mut(height)
        .for_each(|col_buffer| fft_height.process(col_buffer));

    img_buffer.copy_from_slice(&transpose(height, width, &transposed));
}

fn transpose<T: Copy + Default>(width: usize, height: usize, matrix: &[T]) -> Vec<T> {
    let mut ind = 0;
    let mut ind_tr;
    let mut transposed = vec![T::default(); matrix.len()];
    for row in 0..height {
        ind_tr = row;
        for _ in 0..width {
            transposed[ind_tr] = matrix[ind];
            ind += 1;
            ind_tr += height;
        }
    }
    transposed
}

/// Swap the diagonally opposite quadrants of a row major buffer.
///
/// Top left goes to bottom right, top right goes to bottom left and
/// conversely, which brings the zero frequency of a Fourier transform to
/// the center of the buffer. With even dimensions, applying it twice gives
/// back the original buffer.
pub fn fftshift<T: Copy + Default>(width: usize, height: usize, matrix: &[T]) -> Vec<T> {
    debug_assert!(width % 2 == 0 && height % 2 == 0, "quadrants need even dimensions");
    let mut shifted = vec![T::default(); matrix.len()];
    let half_width = width / 2;
    let half_height = height / 2;
    for (row, m_row) in matrix.chunks_exact(width).enumerate() {
        // Top rows go to the bottom and conversely.
        let srow = (row + half_height) % height;
        let s_row = &mut shifted[srow * width..(srow + 1) * width];
        // swap left and right
        s_row[width - half_width..width].copy_from_slice(&m_row[0..half_width]);
        s_row[0..width - half_width].copy_from_slice(&m_row[half_width..width]);
    }
    shifted
}
