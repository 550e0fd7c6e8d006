//! 参数化三次样条曲线.

use ndarray::{s, Array, Array1, Array2, ArrayView1, Axis};
use ndarray_linalg::Solve;

/// 以弦长为参数的平面三次样条曲线.
///
/// 对控制点序列 `(x_i, y_i)` 按归一化弦长 `t ∈ [0, 1]` 参数化,
/// 并对 `x(t)`, `y(t)` 分别拟合自然三次样条. 零平滑, 曲线精确经过
/// 全部控制点. 与按单一自变量拟合不同, 参数化形式允许 y 非单调.
pub(crate) struct ParametricCurve<'a> {
    /// 归一化弦长参数, 严格递增, 两端为 0 和 1.
    t: Array1<f64>,
    x: ArrayView1<'a, f64>,
    y: ArrayView1<'a, f64>,
    coe_x: Array2<f64>,
    coe_y: Array2<f64>,
}

impl<'a> ParametricCurve<'a> {
    pub fn new(x: ArrayView1<'a, f64>, y: ArrayView1<'a, f64>) -> Self {
        assert_eq!(x.len(), y.len(), "x 值和 y 值必须一一对应");
        assert!(x.len() >= 3, "该样条曲线至少需要三个点");

        let mut t = Array1::<f64>::zeros(x.len());
        for i in 1..x.len() {
            let chord = ((x[i] - x[i - 1]).powi(2) + (y[i] - y[i - 1]).powi(2)).sqrt();
            assert!(chord > 0.0, "相邻控制点不允许重合");
            t[i] = t[i - 1] + chord;
        }
        let total = *t.last().unwrap();
        t.mapv_inplace(|v| v / total);

        let coe_x = spline_coefficient(t.view(), x);
        let coe_y = spline_coefficient(t.view(), y);
        Self {
            t,
            x,
            y,
            coe_x,
            coe_y,
        }
    }

    /// 在 `[0, 1]` 上等参数距取 `ticks` 个点 (含两端) 并求曲线值.
    ///
    /// 末端采样点直接取末控制点, 规避浮点误差.
    pub fn sample(&self, ticks: usize) -> (Vec<f64>, Vec<f64>) {
        assert!(ticks >= 2, "至少需要两个采样点");

        let ts = Array::linspace(0.0, 1.0, ticks);
        let mut sx = Vec::with_capacity(ticks);
        let mut sy = Vec::with_capacity(ticks);

        // 采样参数与节点同为升序, 用游标定位所在区间即可.
        let mut seg = 0usize;
        let last_seg = self.t.len() - 2;
        for &tick in ts.iter().take(ticks - 1) {
            while seg < last_seg && self.t[seg + 1] <= tick {
                seg += 1;
            }
            let dt = tick - self.t[seg];
            sx.push(eval_segment(&self.coe_x, self.x[seg], seg, dt));
            sy.push(eval_segment(&self.coe_y, self.y[seg], seg, dt));
        }
        sx.push(*self.x.last().unwrap());
        sy.push(*self.y.last().unwrap());
        (sx, sy)
    }
}

/// 区间 `[t_seg, t_seg+1]` 上的三次多项式求值. `dt` 为距区间左端的参数距.
#[inline]
fn eval_segment(coe: &Array2<f64>, base: f64, seg: usize, dt: f64) -> f64 {
    let (b, c, d) = (coe[(seg, 0)], coe[(seg, 1)], coe[(seg, 2)]);
    base + dt * (b + dt * (c + dt * d))
}

/// 计算自然三次样条系数.
///
/// 第 `i` 行为区间 `[t_i, t_{i+1}]` 上的 `(b, c, d)`, 曲线值为
/// `v_i + b*dt + c*dt^2 + d*dt^3`.
fn spline_coefficient(t: ArrayView1<f64>, v: ArrayView1<f64>) -> Array2<f64> {
    let len = t.len();
    let mut a = Array2::<f64>::zeros((len, len));
    let mut r = Array1::<f64>::zeros(len);
    let dt = array1_diff(t);
    let dv = array1_diff(v);
    for i in 1..(len - 1) {
        let mut a_slice = a.slice_mut(s!(i, (i - 1)..=(i + 1)));
        a_slice.assign(&ArrayView1::from(&[
            dt[i - 1],
            2.0 * (dt[i - 1] + dt[i]),
            dt[i],
        ]));
        r[i] = 3.0 * (dv[i] / dt[i] - dv[i - 1] / dt[i - 1]);
    }
    *a.first_mut().unwrap() = 1.0;
    *a.last_mut().unwrap() = 1.0;

    let mut coe: Array2<f64> = Array2::zeros((len, 3));

    // 系数矩阵三对角且严格对角占优, 必定可解.
    let c = a.solve(&r).unwrap();
    coe.slice_mut(s!(.., 1)).assign(&c);

    for i in 0..(len - 1) {
        coe[(i, 2)] = (coe[(i + 1, 1)] - coe[(i, 1)]) / (3.0 * dt[i]);
        coe[(i, 0)] = dv[i] / dt[i] - dt[i] * (2.0 * coe[(i, 1)] + coe[(i + 1, 1)]) / 3.0;
    }
    coe.remove_index(Axis(0), coe.len_of(Axis(0)) - 1);
    coe
}

fn array1_diff(arr: ArrayView1<f64>) -> Array1<f64> {
    let vector: Vec<f64> = arr.windows(2).into_iter().map(|v| v[1] - v[0]).collect();
    Array1::from_vec(vector)
}
